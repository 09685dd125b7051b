//! Batch executor.
//!
//! One batch runs in four phases, all on the calling thread except the last:
//! 1. validate sizes and the central state against the table;
//! 2. materialize every generator choice;
//! 3. allocate the walk and distance buffers at their final size;
//! 4. split the buffers into one contiguous walk range per worker and fill
//!    each range independently.
//!
//! Workers share the table, central state, and choices read-only and write
//! only to their own `&mut` region, so the hot path has no locks or atomics.
//! Output depends only on `(gens, central_state, choices)`, never on the
//! worker count.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::buffer::{WalkRegion, Walks};
use crate::config::WalkConfig;
use crate::error::{Result, WalkError};
use crate::generators::GeneratorTable;
use crate::partition::{static_ranges, workers_for};
use crate::sampler::{ChoiceSource, ChoiceTable};
use crate::transition;
use crate::Token;

/// Run one batch described by `config`.
///
/// ```
/// use permwalk_core::{random_walks, GeneratorTable, Validation, WalkConfig};
///
/// let gens = GeneratorTable::from_rows(&[vec![0, 1], vec![1, 0]], Validation::Permutation)?;
/// let cfg = WalkConfig { num_walks: 4, walks_len: 3, threads: 2, seed: Some(1), ..Default::default() };
/// let walks = random_walks(&gens, &[5, 7], &cfg)?;
/// assert_eq!(walks.shape(), [4, 3, 2]);
/// # Ok::<(), permwalk_core::WalkError>(())
/// ```
pub fn random_walks(gens: &GeneratorTable, central_state: &[Token], config: &WalkConfig) -> Result<Walks> {
    WalkExecutor::new(config.threads).run(
        gens,
        central_state,
        config.num_walks,
        config.walks_len,
        config.choice_source(),
    )
}

/// Fills walk batches on a fixed number of workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkExecutor {
    threads: usize,
}

impl WalkExecutor {
    /// Executor with `threads` workers; 0 or 1 run sequentially on the caller.
    #[must_use]
    pub const fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// Requested thread count.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Validate, draw choices from `source`, and fill a batch.
    pub fn run(
        &self,
        gens: &GeneratorTable,
        central_state: &[Token],
        num_walks: i64,
        walks_len: i64,
        source: ChoiceSource,
    ) -> Result<Walks> {
        let (num_walks, walks_len) = check_sizes(num_walks, walks_len)?;
        check_central(gens, central_state)?;
        let choices = source.draw(num_walks, walks_len, gens.num_gens())?;
        self.execute(gens, central_state, &choices)
    }

    /// Like [`WalkExecutor::run`], drawing choices from an injected RNG.
    ///
    /// The RNG is advanced once per choice and only on the calling thread.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        gens: &GeneratorTable,
        central_state: &[Token],
        num_walks: i64,
        walks_len: i64,
        rng: &mut R,
    ) -> Result<Walks> {
        let (num_walks, walks_len) = check_sizes(num_walks, walks_len)?;
        check_central(gens, central_state)?;
        let choices = ChoiceTable::sample(num_walks, walks_len, gens.num_gens(), rng)?;
        self.execute(gens, central_state, &choices)
    }

    /// Fill a batch from pre-drawn choices. Shape comes from the choice table.
    pub fn execute(
        &self,
        gens: &GeneratorTable,
        central_state: &[Token],
        choices: &ChoiceTable,
    ) -> Result<Walks> {
        check_central(gens, central_state)?;
        if choices.num_gens() > gens.num_gens() {
            return Err(WalkError::domain(format!(
                "choices index up to {} generators, table has {}",
                choices.num_gens(),
                gens.num_gens()
            )));
        }

        let num_walks = choices.num_walks();
        let walks_len = choices.walks_len();
        let mut walks = Walks::zeroed(num_walks, walks_len, gens.state_size())?;

        // At most one worker per walk.
        let workers = workers_for(self.threads).min(num_walks.max(1));
        debug!(
            num_walks,
            walks_len,
            state_size = gens.state_size(),
            num_gens = gens.num_gens(),
            threads = self.threads,
            workers,
            "dispatching walk batch"
        );
        if num_walks == 0 || walks_len == 0 {
            return Ok(walks);
        }

        let ranges = static_ranges(num_walks, workers);
        let regions = walks.regions_mut(&ranges);
        if workers == 1 {
            for region in regions {
                fill_region(region, gens, central_state, choices);
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("permwalk-{i}"))
                .build()?;
            pool.install(|| {
                regions
                    .into_par_iter()
                    .for_each(|region| fill_region(region, gens, central_state, choices));
            });
        }
        Ok(walks)
    }
}

fn check_sizes(num_walks: i64, walks_len: i64) -> Result<(usize, usize)> {
    let num_walks = usize::try_from(num_walks)
        .map_err(|_| WalkError::domain(format!("num_walks must be non-negative, got {num_walks}")))?;
    let walks_len = usize::try_from(walks_len)
        .map_err(|_| WalkError::domain(format!("walks_len must be non-negative, got {walks_len}")))?;
    Ok((num_walks, walks_len))
}

fn check_central(gens: &GeneratorTable, central_state: &[Token]) -> Result<()> {
    if central_state.len() != gens.state_size() {
        return Err(WalkError::shape(format!(
            "central state has {} components, generators act on {}",
            central_state.len(),
            gens.state_size()
        )));
    }
    Ok(())
}

/// Fill every walk of one region. Runs on exactly one worker.
fn fill_region(
    region: WalkRegion<'_>,
    gens: &GeneratorTable,
    central_state: &[Token],
    choices: &ChoiceTable,
) {
    let walks_len = choices.walks_len();
    let stride = walks_len * central_state.len();
    trace!(
        first_walk = region.first_walk,
        walks = region.distances.len() / walks_len,
        "filling region"
    );
    let trajectories = region.states.chunks_exact_mut(stride);
    let labels = region.distances.chunks_exact_mut(walks_len);
    for (i, (trajectory, labels)) in trajectories.zip(labels).enumerate() {
        fill_walk(trajectory, labels, gens, central_state, choices.row(region.first_walk + i));
    }
}

/// Slot 0 is the central state; slot `s` is gathered from slot `s - 1`.
fn fill_walk(
    trajectory: &mut [Token],
    labels: &mut [Token],
    gens: &GeneratorTable,
    central_state: &[Token],
    choices: &[usize],
) {
    let state_size = central_state.len();
    trajectory[..state_size].copy_from_slice(central_state);
    labels[0] = 0;
    for (prev, &g) in choices.iter().enumerate() {
        let step = prev + 1;
        let (done, rest) = trajectory.split_at_mut(step * state_size);
        transition::apply_into(&done[prev * state_size..], gens.row(g), &mut rest[..state_size]);
        labels[step] = Token::try_from(step).unwrap_or(Token::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Validation;

    fn table(rows: &[Vec<i64>]) -> GeneratorTable {
        GeneratorTable::from_rows(rows, Validation::Permutation).unwrap()
    }

    #[test]
    fn single_three_cycle_walks_its_orbit() {
        let gens = table(&[vec![1, 2, 0]]);
        let walks = WalkExecutor::new(0)
            .run(&gens, &[10, 20, 30], 1, 4, ChoiceSource::Seed(0))
            .unwrap();
        assert_eq!(
            walks.trajectory(0),
            &[10, 20, 30, 20, 30, 10, 30, 10, 20, 10, 20, 30]
        );
        assert_eq!(walks.distances(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn supplied_choices_swap_then_identity() {
        let gens = table(&[vec![0, 1], vec![1, 0]]);
        let choices = ChoiceTable::from_rows(&[vec![1, 0]], 3, 2).unwrap();
        let walks = WalkExecutor::new(0).execute(&gens, &[5, 7], &choices).unwrap();
        assert_eq!(walks.trajectory(0), &[5, 7, 7, 5, 7, 5]);
        assert_eq!(walks.distances(0), &[0, 1, 2]);
    }

    #[test]
    fn thread_count_does_not_change_output() {
        let gens = table(&[vec![1, 2, 3, 0], vec![1, 0, 2, 3], vec![0, 1, 3, 2]]);
        let choices = ChoiceTable::from_seed(37, 9, 3, 2024).unwrap();
        let central = [4, 3, 2, 1];
        let seq = WalkExecutor::new(0).execute(&gens, &central, &choices).unwrap();
        for threads in [1, 2, 3, 8, 64] {
            let par = WalkExecutor::new(threads).execute(&gens, &central, &choices).unwrap();
            assert_eq!(seq, par, "threads={threads}");
        }
    }

    #[test]
    fn huge_thread_counts_are_capped_at_the_walk_count() {
        let gens = table(&[vec![1, 0], vec![0, 1]]);
        let choices = ChoiceTable::from_seed(2, 6, 2, 5).unwrap();
        let seq = WalkExecutor::new(0).execute(&gens, &[1, 2], &choices).unwrap();
        for threads in [usize::MAX, 1 << 40, 100_000] {
            let par = WalkExecutor::new(threads).execute(&gens, &[1, 2], &choices).unwrap();
            assert_eq!(seq, par, "threads={threads}");
        }
        let none = ChoiceTable::from_seed(0, 6, 2, 5).unwrap();
        let w = WalkExecutor::new(usize::MAX).execute(&gens, &[1, 2], &none).unwrap();
        assert!(w.states_flat().is_empty());
    }

    #[test]
    fn empty_axes() {
        let gens = table(&[vec![1, 0]]);
        let w = WalkExecutor::new(4).run(&gens, &[1, 2], 3, 0, ChoiceSource::Seed(1)).unwrap();
        assert_eq!(w.shape(), [3, 0, 2]);
        assert_eq!(w.distances_shape(), [3, 0]);
        let w = WalkExecutor::new(4).run(&gens, &[1, 2], 0, 5, ChoiceSource::Seed(1)).unwrap();
        assert!(w.states_flat().is_empty());
        let w = WalkExecutor::new(4).run(&gens, &[1, 2], 2, 1, ChoiceSource::Seed(1)).unwrap();
        assert_eq!(w.states_flat(), &[1, 2, 1, 2]);
        assert_eq!(w.distances_flat(), &[0, 0]);
    }

    #[test]
    fn rejects_bad_inputs_before_allocating() {
        let gens = table(&[vec![1, 0]]);
        let ex = WalkExecutor::new(0);
        assert!(ex.run(&gens, &[1, 2], -1, 3, ChoiceSource::Entropy).unwrap_err().is_domain());
        assert!(ex.run(&gens, &[1, 2], 1, -3, ChoiceSource::Entropy).unwrap_err().is_domain());
        assert!(ex.run(&gens, &[1, 2, 3], 1, 3, ChoiceSource::Entropy).unwrap_err().is_shape());

        let none = GeneratorTable::from_flat(&[], 0, 2, Validation::Permutation).unwrap();
        assert!(ex.run(&none, &[1, 2], 1, 3, ChoiceSource::Entropy).unwrap_err().is_domain());
        assert!(ex.run(&none, &[1, 2], 4, 1, ChoiceSource::Entropy).is_ok());
    }

    #[test]
    fn choices_for_a_larger_table_are_rejected() {
        let gens = table(&[vec![1, 0]]);
        let choices = ChoiceTable::from_rows(&[vec![1]], 2, 2).unwrap();
        assert!(WalkExecutor::new(0).execute(&gens, &[1, 2], &choices).unwrap_err().is_domain());
    }

    #[test]
    fn injected_rng_matches_seeded_source() {
        use rand::SeedableRng;
        let gens = table(&[vec![1, 2, 0], vec![0, 2, 1]]);
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let a = WalkExecutor::new(2).run_with_rng(&gens, &[1, 2, 3], 6, 5, &mut rng).unwrap();
        let b = WalkExecutor::new(0).run(&gens, &[1, 2, 3], 6, 5, ChoiceSource::Seed(11)).unwrap();
        assert_eq!(a, b);
    }
}
