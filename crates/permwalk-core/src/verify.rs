//! Consistency checks for produced batches.
//!
//! Useful when a batch comes back from disk or from another process and the
//! choices that produced it are no longer available.

use crate::buffer::Walks;
use crate::error::{Result, WalkError};
use crate::generators::GeneratorTable;
use crate::sampler::ChoiceTable;
use crate::transition;
use crate::Token;

/// Check `walks` against the table and central state alone.
///
/// Every walk must start at `central_state`, carry label `s` at step `s`, and
/// move between consecutive states by some generator in `gens`.
pub fn verify_walks(walks: &Walks, gens: &GeneratorTable, central_state: &[Token]) -> Result<()> {
    check_frame(walks, gens, central_state)?;
    let mut scratch = vec![0; gens.state_size()];
    for w in 0..walks.num_walks() {
        check_start_and_labels(walks, w, central_state)?;
        for step in 1..walks.walks_len() {
            let prev = walks.state(w, step - 1);
            let cur = walks.state(w, step);
            let reachable = gens.rows().any(|g| {
                transition::apply_into(prev, g, &mut scratch);
                scratch == cur
            });
            if !reachable {
                return Err(WalkError::Inconsistent {
                    walk: w,
                    step,
                    reason: "no generator maps the previous state to this one".into(),
                });
            }
        }
    }
    Ok(())
}

/// Check `walks` against the exact choices that produced it.
pub fn verify_walks_with_choices(
    walks: &Walks,
    gens: &GeneratorTable,
    central_state: &[Token],
    choices: &ChoiceTable,
) -> Result<()> {
    check_frame(walks, gens, central_state)?;
    if choices.num_walks() != walks.num_walks() || choices.walks_len() != walks.walks_len() {
        return Err(WalkError::shape(format!(
            "choices are {} x len {}, walks are {} x len {}",
            choices.num_walks(),
            choices.walks_len(),
            walks.num_walks(),
            walks.walks_len()
        )));
    }
    let mut scratch = vec![0; gens.state_size()];
    for w in 0..walks.num_walks() {
        check_start_and_labels(walks, w, central_state)?;
        for (prev, &c) in choices.row(w).iter().enumerate() {
            let step = prev + 1;
            if c >= gens.num_gens() {
                return Err(WalkError::Inconsistent {
                    walk: w,
                    step,
                    reason: format!("choice {c} has no generator"),
                });
            }
            transition::apply_into(walks.state(w, prev), gens.row(c), &mut scratch);
            if scratch != walks.state(w, step) {
                return Err(WalkError::Inconsistent {
                    walk: w,
                    step,
                    reason: format!("state differs from generator {c} applied to step {prev}"),
                });
            }
        }
    }
    Ok(())
}

fn check_frame(walks: &Walks, gens: &GeneratorTable, central_state: &[Token]) -> Result<()> {
    if walks.state_size() != gens.state_size() || central_state.len() != gens.state_size() {
        return Err(WalkError::shape(format!(
            "walk width {}, central width {}, generator width {} must agree",
            walks.state_size(),
            central_state.len(),
            gens.state_size()
        )));
    }
    Ok(())
}

fn check_start_and_labels(walks: &Walks, w: usize, central_state: &[Token]) -> Result<()> {
    if walks.walks_len() == 0 {
        return Ok(());
    }
    if walks.state(w, 0) != central_state {
        return Err(WalkError::Inconsistent {
            walk: w,
            step: 0,
            reason: "walk does not start at the central state".into(),
        });
    }
    for (step, &label) in walks.distances(w).iter().enumerate() {
        if usize::try_from(label).ok() != Some(step) {
            return Err(WalkError::Inconsistent {
                walk: w,
                step,
                reason: format!("distance label {label} != step {step}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::WalkExecutor;
    use crate::generators::Validation;

    fn gens() -> GeneratorTable {
        GeneratorTable::from_rows(&[vec![1, 2, 0], vec![1, 0, 2]], Validation::Permutation).unwrap()
    }

    #[test]
    fn executor_output_verifies() {
        let g = gens();
        let choices = ChoiceTable::from_seed(10, 6, 2, 3).unwrap();
        let w = WalkExecutor::new(3).execute(&g, &[7, 8, 9], &choices).unwrap();
        verify_walks(&w, &g, &[7, 8, 9]).unwrap();
        verify_walks_with_choices(&w, &g, &[7, 8, 9], &choices).unwrap();
    }

    #[test]
    fn tampered_state_is_reported() {
        let g = gens();
        let choices = ChoiceTable::from_seed(2, 4, 2, 3).unwrap();
        let w = WalkExecutor::new(0).execute(&g, &[7, 8, 9], &choices).unwrap();
        let (mut states, distances) = w.into_parts();
        // Walk 1, step 2, component 0.
        states[(4 + 2) * 3] = 100;
        let bad = Walks::from_parts(2, 4, 3, states, distances).unwrap();
        match verify_walks(&bad, &g, &[7, 8, 9]).unwrap_err() {
            WalkError::Inconsistent { walk, step, .. } => assert_eq!((walk, step), (1, 2)),
            other => panic!("unexpected {other}"),
        }
        assert!(verify_walks_with_choices(&bad, &g, &[7, 8, 9], &choices).is_err());
    }

    #[test]
    fn wrong_labels_and_start_are_reported() {
        let g = gens();
        let bad = Walks::from_parts(1, 2, 3, vec![7, 8, 9, 8, 9, 7], vec![0, 2]).unwrap();
        assert!(matches!(
            verify_walks(&bad, &g, &[7, 8, 9]),
            Err(WalkError::Inconsistent { step: 1, .. })
        ));
        assert!(matches!(
            verify_walks(&bad, &g, &[9, 8, 7]),
            Err(WalkError::Inconsistent { step: 0, .. })
        ));
    }
}
