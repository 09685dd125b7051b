use std::path::PathBuf;

use permwalk_core::{random_walks, Validation, WalkConfig};
use permwalk_defs::{
    format::GraphDef,
    io::{read_def_auto, read_walks_auto, write_def_auto, write_walks_auto, WalkRecord},
    presets::{build, Family},
};

fn tmp(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("permwalk-defs-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn definitions_survive_json_and_cbor() {
    let def = build(Family::Coxeter, 5).unwrap();
    for name in ["coxeter.json", "coxeter.CBOR"] {
        let path = tmp(name);
        write_def_auto(&path, &def).unwrap();
        let back: GraphDef = read_def_auto(&path).unwrap();
        assert_eq!(back, def);
    }
}

#[test]
fn unknown_read_extension_is_rejected() {
    let path = tmp("def.yaml");
    write_def_auto(&path, &build(Family::Lrx, 3).unwrap()).unwrap();
    let err = read_def_auto(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported"), "{err:#}");
    assert!(read_walks_auto(tmp("noext")).is_err());
}

#[test]
fn batches_write_in_every_format() {
    let def = build(Family::Lrx, 4).unwrap();
    let gens = def.table(Validation::Permutation).unwrap();
    let cfg = WalkConfig { num_walks: 3, walks_len: 5, threads: 2, seed: Some(11), ..WalkConfig::default() };
    let walks = random_walks(&gens, &def.central_state, &cfg).unwrap();

    for name in ["walks.json", "walks.cbor"] {
        let path = tmp(name);
        write_walks_auto(&path, &walks).unwrap();
        assert_eq!(read_walks_auto(&path).unwrap(), walks);
    }

    let path = tmp("walks.jsonl");
    write_walks_auto(&path, &walks).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let records: Vec<WalkRecord> =
        text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].walk, 2);
    assert_eq!(records[1].states[0], def.central_state);
    assert_eq!(records[1].distances, vec![0, 1, 2, 3, 4]);
}

#[test]
fn tampered_batch_files_fail_to_load() {
    let path = tmp("short.json");
    std::fs::write(
        &path,
        r#"{"num_walks":1,"walks_len":2,"state_size":2,"states":[0,1,1],"distances":[0,1]}"#,
    )
    .unwrap();
    assert!(read_walks_auto(&path).is_err());
}
