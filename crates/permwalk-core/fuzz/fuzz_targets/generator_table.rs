#![no_main]
use ciborium::de::from_reader;
use libfuzzer_sys::fuzz_target;
use permwalk_core::{ChoiceSource, GeneratorTable, Validation, WalkExecutor};

fuzz_target!(|data: &[u8]| {
    let Ok(rows) = from_reader::<Vec<Vec<i64>>, _>(data) else {
        return;
    };
    let Ok(gens) = GeneratorTable::from_rows(&rows, Validation::Permutation) else {
        return;
    };
    if gens.state_size() > 64 {
        return;
    }
    let central: Vec<i64> = (0..gens.state_size() as i64).collect();
    let walks = WalkExecutor::new(2)
        .run(&gens, &central, 4, 8, ChoiceSource::Seed(data.len() as u64))
        .unwrap();
    permwalk_core::verify_walks(&walks, &gens, &central).unwrap();
});
