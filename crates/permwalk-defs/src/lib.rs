//! Generator-set definitions and batch file formats.
//!
//! Three small building blocks on top of `permwalk-core`:
//!
//! - `format`: a versioned definition envelope (`GraphDef`) naming a set of
//!   generators and the central state walks start from.
//! - `presets`: well-known generator families (LRX, transpositions, Coxeter,
//!   cyclic Coxeter, 3-cycles) built from `permwalk_core::perm`.
//! - `io`: JSON/CBOR read/write for definitions and JSON/CBOR/JSONL for batches,
//!   with extension-based auto-detection.
//!
//! Callers import stable module paths like `permwalk_defs::presets::build`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

/// Versioned generator-set definition envelope.
pub mod format;
/// JSON/CBOR/JSONL I/O helpers for definitions and batches.
pub mod io;
/// Named generator families.
pub mod presets;
