//! permwalk-core: random walks over the action of permutation generators.
//!
//! This crate is the computational primitive behind the workspace:
//! - a validated, immutable [`GeneratorTable`] of permutations,
//! - the [`ChoiceTable`] sampler (injectable RNG, seed, or pre-drawn table),
//! - the allocation-free [`transition`] gather `next[k] = cur[gen[k]]`,
//! - the exactly-sized [`Walks`] buffer with fixed `[walk, step, component]`
//!   addressing, and
//! - the [`WalkExecutor`] that fills disjoint walk ranges on a static worker
//!   partition with no locks on the hot path.
//!
//! ```
//! use permwalk_core::prelude::*;
//!
//! let gens = GeneratorTable::from_rows(&[vec![1, 2, 0]], Validation::Permutation)?;
//! let choices = ChoiceTable::from_rows(&[vec![0, 0, 0]], 4, 1)?;
//! let walks = WalkExecutor::new(0).execute(&gens, &[10, 20, 30], &choices)?;
//! assert_eq!(walks.state(0, 1), &[20, 30, 10]);
//! assert_eq!(walks.distances(0), &[0, 1, 2, 3]);
//! # Ok::<(), permwalk_core::WalkError>(())
//! ```
//!
//! The distance label is the step ordinal along the walk. It bounds the true
//! graph distance to the central state from above and is not a shortest path.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Exactly-sized walk and distance buffers with fixed addressing.
pub mod buffer;
/// Serde-backed batch configuration.
pub mod config;
/// Error taxonomy shared by every operation in the crate.
pub mod error;
/// Batch executor: validation, choice drawing, and parallel fill.
pub mod executor;
/// Validated generator tables.
pub mod generators;
/// Static partitioning of walk ranges across workers.
pub mod partition;
/// Permutation helpers (composition, inversion, cycles, transpositions).
pub mod perm;
/// Generator-choice sampling.
pub mod sampler;
/// The state transition gather.
pub mod transition;
/// Post-hoc consistency checks for produced batches.
pub mod verify;

pub use buffer::Walks;
pub use config::WalkConfig;
pub use error::{Result, WalkError};
pub use executor::{random_walks, WalkExecutor};
pub use generators::{GeneratorTable, Validation};
pub use sampler::{ChoiceSource, ChoiceTable};
pub use verify::{verify_walks, verify_walks_with_choices};

/// Component value of a state (an arbitrary discrete token).
///
/// Distances share this type so both output buffers match the host's element type.
pub type Token = i64;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use permwalk_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        buffer::Walks,
        config::WalkConfig,
        error::{Result, WalkError},
        executor::{random_walks, WalkExecutor},
        generators::{GeneratorTable, Validation},
        sampler::{ChoiceSource, ChoiceTable},
        Token,
    };
}
