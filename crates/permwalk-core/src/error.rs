//! Error taxonomy for walk generation.
//!
//! Every failure is an input or programming error surfaced eagerly, before any
//! buffer is allocated or any worker is dispatched. Nothing is retried.

use thiserror::Error;

/// Result type alias using [`WalkError`].
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors produced by table construction, sampling, execution, and verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    /// Wrong dimensionality or lengths (non-rectangular table, zero width, mismatched buffers).
    #[error("shape error: {0}")]
    Shape(String),

    /// A value outside its admissible domain (negative sizes, non-permutation rows, …).
    #[error("domain error: {0}")]
    Domain(String),

    /// A produced batch violates a walk invariant.
    #[error("inconsistent walk {walk} at step {step}: {reason}")]
    Inconsistent {
        /// Walk index.
        walk: usize,
        /// Step index within the walk.
        step: usize,
        /// What failed.
        reason: String,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl WalkError {
    /// Shorthand for [`WalkError::Shape`].
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Shorthand for [`WalkError::Domain`].
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// `true` for [`WalkError::Shape`].
    #[must_use]
    pub const fn is_shape(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    /// `true` for [`WalkError::Domain`].
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

impl From<rayon::ThreadPoolBuildError> for WalkError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_category() {
        assert_eq!(
            WalkError::shape("ragged").to_string(),
            "shape error: ragged"
        );
        let e = WalkError::Inconsistent { walk: 2, step: 5, reason: "label".into() };
        assert_eq!(e.to_string(), "inconsistent walk 2 at step 5: label");
        assert!(WalkError::domain("x").is_domain());
        assert!(!WalkError::domain("x").is_shape());
    }
}
