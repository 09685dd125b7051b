//! Generator-choice sampling.
//!
//! All choices for a batch are materialized before any walk is filled, so the
//! random source is touched once, on the calling thread, and workers only ever
//! read the finished table.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, WalkError};

/// Where a batch's generator choices come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChoiceSource {
    /// Fresh entropy from the thread-local RNG.
    #[default]
    Entropy,
    /// Deterministic ChaCha8 stream seeded with this value.
    Seed(u64),
    /// A pre-drawn table, used verbatim.
    Table(ChoiceTable),
}

/// `[num_walks, walks_len - 1]` table of generator indices.
///
/// Row `w` holds the choices consumed by walk `w`; entry `s` selects the
/// generator producing step `s + 1` from step `s`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceTable {
    num_walks: usize,
    walks_len: usize,
    num_gens: usize,
    data: Vec<usize>,
}

/// Number of choices per walk: one per step after the central state.
#[inline]
#[must_use]
pub const fn steps_for(walks_len: usize) -> usize {
    walks_len.saturating_sub(1)
}

impl ChoiceTable {
    /// Draw a table uniformly in `[0, num_gens)` from `rng`, row-major.
    ///
    /// Makes one `random_range` call per choice, `num_walks * (walks_len - 1)`
    /// in total, in row-major order.
    pub fn sample<R: Rng + ?Sized>(
        num_walks: usize,
        walks_len: usize,
        num_gens: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let len = Self::checked_len(num_walks, walks_len, num_gens)?;
        let data = (0..len).map(|_| rng.random_range(0..num_gens)).collect();
        Ok(Self { num_walks, walks_len, num_gens, data })
    }

    /// Draw a table from a seeded ChaCha8 stream.
    pub fn from_seed(num_walks: usize, walks_len: usize, num_gens: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::sample(num_walks, walks_len, num_gens, &mut rng)
    }

    /// Wrap a pre-drawn row-major table of `num_walks * (walks_len - 1)` indices.
    pub fn from_flat(
        data: Vec<usize>,
        num_walks: usize,
        walks_len: usize,
        num_gens: usize,
    ) -> Result<Self> {
        let len = Self::checked_len(num_walks, walks_len, num_gens)?;
        if data.len() != len {
            return Err(WalkError::shape(format!(
                "choice table has {} entries, expected {num_walks} x {} = {len}",
                data.len(),
                steps_for(walks_len)
            )));
        }
        if let Some(pos) = data.iter().position(|&c| c >= num_gens) {
            let steps = steps_for(walks_len);
            return Err(WalkError::domain(format!(
                "choice {} at walk {}, step {} is outside [0, {num_gens})",
                data[pos],
                pos / steps,
                pos % steps
            )));
        }
        Ok(Self { num_walks, walks_len, num_gens, data })
    }

    /// Wrap nested rows, one per walk, each with `walks_len - 1` entries.
    pub fn from_rows(rows: &[Vec<usize>], walks_len: usize, num_gens: usize) -> Result<Self> {
        let steps = steps_for(walks_len);
        let mut data = Vec::with_capacity(rows.len().saturating_mul(steps));
        for (w, row) in rows.iter().enumerate() {
            if row.len() != steps {
                return Err(WalkError::shape(format!(
                    "choice row {w} has {} entries, expected {steps} for walks_len={walks_len}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_flat(data, rows.len(), walks_len, num_gens)
    }

    fn checked_len(num_walks: usize, walks_len: usize, num_gens: usize) -> Result<usize> {
        let steps = steps_for(walks_len);
        if num_gens == 0 && steps > 0 {
            return Err(WalkError::domain(format!(
                "no generators to choose from, but walks_len={walks_len} requires steps"
            )));
        }
        num_walks
            .checked_mul(steps)
            .ok_or_else(|| WalkError::domain("num_walks * (walks_len - 1) overflows usize"))
    }

    /// Number of walks (rows).
    #[inline]
    #[must_use]
    pub const fn num_walks(&self) -> usize {
        self.num_walks
    }

    /// Walk length the table was drawn for (central state included).
    #[inline]
    #[must_use]
    pub const fn walks_len(&self) -> usize {
        self.walks_len
    }

    /// Choices per walk (`walks_len - 1`, or 0).
    #[inline]
    #[must_use]
    pub const fn steps(&self) -> usize {
        steps_for(self.walks_len)
    }

    /// Upper bound (exclusive) on every entry.
    #[inline]
    #[must_use]
    pub const fn num_gens(&self) -> usize {
        self.num_gens
    }

    /// Choices of walk `w`.
    #[inline]
    #[must_use]
    pub fn row(&self, w: usize) -> &[usize] {
        let steps = self.steps();
        &self.data[w * steps..(w + 1) * steps]
    }

    /// Choice producing step `s + 1` of walk `w`.
    #[inline]
    #[must_use]
    pub fn get(&self, w: usize, s: usize) -> usize {
        self.row(w)[s]
    }

    /// Flat row-major view.
    #[inline]
    #[must_use]
    pub fn as_flat(&self) -> &[usize] {
        &self.data
    }
}

impl ChoiceSource {
    /// Materialize the full table for a batch of the given shape.
    ///
    /// A [`ChoiceSource::Table`] must match the requested shape and generator count.
    pub fn draw(self, num_walks: usize, walks_len: usize, num_gens: usize) -> Result<ChoiceTable> {
        match self {
            Self::Entropy => ChoiceTable::sample(num_walks, walks_len, num_gens, &mut rand::rng()),
            Self::Seed(seed) => ChoiceTable::from_seed(num_walks, walks_len, num_gens, seed),
            Self::Table(table) => {
                if table.num_walks != num_walks || table.walks_len != walks_len {
                    return Err(WalkError::shape(format!(
                        "choice table is {} walks x len {}, batch is {num_walks} x {walks_len}",
                        table.num_walks, table.walks_len
                    )));
                }
                if table.num_gens > num_gens {
                    return Err(WalkError::domain(format!(
                        "choice table was built for {} generators, table has {num_gens}",
                        table.num_gens
                    )));
                }
                Ok(table)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_shape_and_range() {
        let t = ChoiceTable::from_seed(7, 5, 3, 42).unwrap();
        assert_eq!(t.num_walks(), 7);
        assert_eq!(t.steps(), 4);
        assert_eq!(t.as_flat().len(), 28);
        assert!(t.as_flat().iter().all(|&c| c < 3));
    }

    #[test]
    fn choices_are_close_to_uniform() {
        for seed in [1, 2024] {
            let t = ChoiceTable::from_seed(1000, 101, 4, seed).unwrap();
            let mut counts = [0usize; 4];
            for &c in t.as_flat() {
                counts[c] += 1;
            }
            let total = t.as_flat().len();
            assert_eq!(total, 100_000);
            for (g, &n) in counts.iter().enumerate() {
                // 25% +/- 2% of 100k draws.
                assert!((23_000..=27_000).contains(&n), "seed={seed} generator {g}: {n} of {total}");
            }
        }
    }

    #[test]
    fn same_seed_same_table() {
        let a = ChoiceTable::from_seed(16, 9, 5, 7).unwrap();
        let b = ChoiceTable::from_seed(16, 9, 5, 7).unwrap();
        let c = ChoiceTable::from_seed(16, 9, 5, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn short_walks_need_no_generators() {
        for len in [0, 1] {
            let t = ChoiceTable::from_seed(4, len, 0, 1).unwrap();
            assert_eq!(t.steps(), 0);
            assert!(t.as_flat().is_empty());
        }
        assert!(ChoiceTable::from_seed(4, 2, 0, 1).unwrap_err().is_domain());
    }

    #[test]
    fn single_generator_always_chosen() {
        let t = ChoiceTable::from_seed(3, 10, 1, 99).unwrap();
        assert!(t.as_flat().iter().all(|&c| c == 0));
    }

    #[test]
    fn supplied_rows_are_checked() {
        let t = ChoiceTable::from_rows(&[vec![1, 0], vec![0, 0]], 3, 2).unwrap();
        assert_eq!(t.get(0, 0), 1);
        assert_eq!(t.row(1), &[0, 0]);
        assert!(ChoiceTable::from_rows(&[vec![1]], 3, 2).unwrap_err().is_shape());
        assert!(ChoiceTable::from_rows(&[vec![2, 0]], 3, 2).unwrap_err().is_domain());
    }

    #[test]
    fn table_source_must_match_batch() {
        let t = ChoiceTable::from_rows(&[vec![1, 0]], 3, 2).unwrap();
        assert!(ChoiceSource::Table(t.clone()).draw(1, 3, 2).is_ok());
        assert!(ChoiceSource::Table(t.clone()).draw(2, 3, 2).unwrap_err().is_shape());
        assert!(ChoiceSource::Table(t).draw(1, 3, 1).unwrap_err().is_domain());
    }
}
