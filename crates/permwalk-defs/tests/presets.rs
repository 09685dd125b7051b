use permwalk_core::{perm, Validation};
use permwalk_defs::presets::{build, Family};

#[track_caller]
fn check_family(f: Family, n: usize, expected_gens: usize) {
    let def = build(f, n).unwrap();
    assert_eq!(def.num_gens(), expected_gens, "{f:?} on {n}");
    assert_eq!(def.generator_names.as_ref().map(Vec::len), Some(expected_gens));
    // Every row is a genuine permutation of the central width.
    let table = def.table(Validation::Permutation).unwrap();
    assert_eq!(table.state_size(), n);
}

#[test]
fn family_sizes() {
    for n in [3usize, 4, 6] {
        check_family(Family::Lrx, n, 3);
        check_family(Family::Transpositions, n, n * (n - 1) / 2);
        check_family(Family::Coxeter, n, n - 1);
        check_family(Family::CyclicCoxeter, n, n);
        check_family(Family::ThreeCycles, n, n * (n - 1) * (n - 2) / 3);
    }
}

#[test]
fn too_small_n_is_rejected() {
    assert!(build(Family::Lrx, 1).is_err());
    assert!(build(Family::ThreeCycles, 2).is_err());
    assert!(build(Family::CyclicCoxeter, 2).is_err());
}

#[test]
fn three_cycles_are_three_cycles() {
    let def = build(Family::ThreeCycles, 5).unwrap();
    for row in &def.generators {
        let p: Vec<usize> = row.iter().map(|&v| usize::try_from(v).unwrap()).collect();
        let moved = p.iter().enumerate().filter(|&(i, &v)| i != v).count();
        assert_eq!(moved, 3);
        assert_eq!(perm::compose(&perm::compose(&p, &p), &p), perm::identity(5));
    }
}

#[test]
fn inverted_lrx_swaps_left_and_right() {
    let def = build(Family::Lrx, 5).unwrap();
    let inv = def.inverted().unwrap();
    assert_eq!(inv.generators[0], def.generators[1]);
    assert_eq!(inv.generators[1], def.generators[0]);
    assert_eq!(inv.generators[2], def.generators[2]);
}
