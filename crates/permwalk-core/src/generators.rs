//! Validated, immutable generator tables.
//!
//! A table holds `num_gens` rows of `state_size` indices in one flat, row-major
//! allocation. Rows are validated once at construction and are never
//! re-checked on the hot path.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkError};
use crate::perm;

/// How much checking [`GeneratorTable`] construction performs on row contents.
///
/// Shape checks (rectangular rows, non-zero width) always run.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Every row must be a bijection of `[0, state_size)`.
    #[default]
    Permutation,
    /// Skip the row check. Fast path for callers that already guarantee valid
    /// permutations: an out-of-range (or negative) entry is not rejected here
    /// and instead panics when a walk reads through it.
    Trusted,
}

/// Immutable `[num_gens, state_size]` table of permutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorTable {
    num_gens: usize,
    state_size: usize,
    data: Vec<usize>,
}

impl GeneratorTable {
    /// Build from a contiguous row-major array, as handed over by a host runtime.
    ///
    /// `data.len()` must equal `num_gens * state_size` and `state_size` must be
    /// positive. `num_gens` may be zero.
    pub fn from_flat(
        data: &[i64],
        num_gens: usize,
        state_size: usize,
        validation: Validation,
    ) -> Result<Self> {
        if state_size == 0 {
            return Err(WalkError::shape("state_size must be positive"));
        }
        let expected = num_gens
            .checked_mul(state_size)
            .ok_or_else(|| WalkError::shape("num_gens * state_size overflows usize"))?;
        if data.len() != expected {
            return Err(WalkError::shape(format!(
                "flat table has {} entries, expected {num_gens} x {state_size} = {expected}",
                data.len()
            )));
        }

        // Negative entries clamp to usize::MAX so a trusted table still panics
        // on use instead of wrapping to a plausible index.
        let data: Vec<usize> =
            data.iter().map(|&v| usize::try_from(v).unwrap_or(usize::MAX)).collect();
        let table = Self { num_gens, state_size, data };
        if validation == Validation::Permutation {
            table.check_rows()?;
        }
        Ok(table)
    }

    /// Build from nested rows; `state_size` is taken from the first row.
    ///
    /// An empty table cannot carry a width, so it is rejected with a shape
    /// error; use [`GeneratorTable::from_flat`] for zero-generator tables.
    pub fn from_rows(rows: &[Vec<i64>], validation: Validation) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(WalkError::shape(
                "cannot infer state_size from an empty generator table",
            ));
        };
        let state_size = first.len();
        let mut flat = Vec::with_capacity(rows.len().saturating_mul(state_size));
        for (g, row) in rows.iter().enumerate() {
            if row.len() != state_size {
                return Err(WalkError::shape(format!(
                    "generator table is not rectangular: row {g} has {} entries, row 0 has {state_size}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        Self::from_flat(&flat, rows.len(), state_size, validation)
    }

    /// Build from rows that are already `usize` permutations (e.g. from [`crate::perm`]).
    pub fn from_perms(perms: &[Vec<usize>], state_size: usize) -> Result<Self> {
        if state_size == 0 {
            return Err(WalkError::shape("state_size must be positive"));
        }
        let mut data = Vec::with_capacity(perms.len().saturating_mul(state_size));
        for (g, p) in perms.iter().enumerate() {
            if p.len() != state_size {
                return Err(WalkError::shape(format!(
                    "permutation {g} has {} entries, expected {state_size}",
                    p.len()
                )));
            }
            data.extend_from_slice(p);
        }
        let table = Self { num_gens: perms.len(), state_size, data };
        table.check_rows()?;
        Ok(table)
    }

    fn check_rows(&self) -> Result<()> {
        for (g, row) in self.rows().enumerate() {
            if let Some(&bad) = row.iter().find(|&&v| v >= self.state_size) {
                return Err(WalkError::domain(format!(
                    "generator {g} has index {} outside [0, {})",
                    display_index(bad),
                    self.state_size
                )));
            }
            if !perm::is_permutation(row) {
                return Err(WalkError::domain(format!(
                    "generator {g} is not a permutation of [0, {})",
                    self.state_size
                )));
            }
        }
        Ok(())
    }

    /// Number of generators.
    #[inline]
    #[must_use]
    pub const fn num_gens(&self) -> usize {
        self.num_gens
    }

    /// Width of every generator (and of every state).
    #[inline]
    #[must_use]
    pub const fn state_size(&self) -> usize {
        self.state_size
    }

    /// Generator `g` as a slice of `state_size` indices.
    ///
    /// Panics if `g >= num_gens()`.
    #[inline]
    #[must_use]
    pub fn row(&self, g: usize) -> &[usize] {
        let start = g * self.state_size;
        &self.data[start..start + self.state_size]
    }

    /// Iterate over all generator rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.data.chunks_exact(self.state_size)
    }

    /// Copy out as nested `i64` rows (the host's element type).
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|r| r.iter().map(|&v| i64::try_from(v).unwrap_or(-1)).collect())
            .collect()
    }

    /// Table of inverse generators, row for row.
    ///
    /// Walking with the inverted table explores the inverted Cayley graph,
    /// whose edges run opposite to this one's.
    ///
    /// Panics on a trusted table whose rows are not permutations.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let data = self.rows().flat_map(perm::inverse).collect();
        Self { num_gens: self.num_gens, state_size: self.state_size, data }
    }
}

fn display_index(v: usize) -> String {
    if v == usize::MAX {
        "<negative>".to_string()
    } else {
        v.to_string()
    }
}
