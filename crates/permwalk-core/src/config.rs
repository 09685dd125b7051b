//! Batch configuration.
//!
//! `WalkConfig` is plain serde data so front ends can load it from TOML/JSON
//! and override individual fields from flags. Every field has a default.

use serde::{Deserialize, Serialize};

use crate::generators::Validation;
use crate::sampler::ChoiceSource;

/// Parameters of one walk batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    /// Number of independent walks. Signed so negative host input is rejected, not wrapped.
    pub num_walks: i64,
    /// States per walk, central state included.
    pub walks_len: i64,
    /// Worker threads; 0 or 1 run on the calling thread.
    pub threads: usize,
    /// Seed for reproducible choices; `None` draws fresh entropy.
    pub seed: Option<u64>,
    /// Row checking for front ends that build the generator table from this
    /// config. [`crate::random_walks`] takes an already-built table and ignores it.
    pub validation: Validation,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            num_walks: 1024,
            walks_len: 32,
            threads: 0,
            seed: None,
            validation: Validation::Permutation,
        }
    }
}

impl WalkConfig {
    /// Choice source implied by `seed`.
    #[must_use]
    pub fn choice_source(&self) -> ChoiceSource {
        self.seed.map_or(ChoiceSource::Entropy, ChoiceSource::Seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: WalkConfig = toml::from_str("num_walks = 8\nseed = 5\n").unwrap();
        assert_eq!(cfg.num_walks, 8);
        assert_eq!(cfg.walks_len, 32);
        assert_eq!(cfg.threads, 0);
        assert_eq!(cfg.choice_source(), ChoiceSource::Seed(5));
        assert_eq!(cfg.validation, Validation::Permutation);
    }

    #[test]
    fn validation_is_snake_case() {
        let cfg: WalkConfig = toml::from_str("validation = \"trusted\"").unwrap();
        assert_eq!(cfg.validation, Validation::Trusted);
        assert!(toml::from_str::<WalkConfig>("walks = 3").is_err());
    }

    #[test]
    fn no_seed_means_entropy() {
        assert_eq!(WalkConfig::default().choice_source(), ChoiceSource::Entropy);
    }
}
