//! # Configuration
//!
//! Explicit configuration of an epsilon-removal run.
//!
//! Verbosity is a field of the configuration handed to the constructor,
//! never process-wide state. Every field has a default so partial
//! configurations deserialize cleanly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which elimination engine runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProperAlgorithm {
    /// Split the automaton into a spontaneous graph and a proper graph and
    /// eliminate across the two.
    #[default]
    Separate,
    /// Eliminate inside a single automaton, filtering spontaneous
    /// transitions by label.
    InPlace,
}

impl fmt::Display for ProperAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProperAlgorithm::Separate => write!(f, "separate"),
            ProperAlgorithm::InPlace => write!(f, "inplace"),
        }
    }
}

/// Configuration of a `Properer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProperConfig {
    /// Delete states that lose all their incoming transitions during
    /// elimination.
    pub prune: bool,
    /// Elimination engine.
    pub algorithm: ProperAlgorithm,
    /// 0 is silent; see `primitives::DEBUG_STEPS` and `DEBUG_QUEUE`.
    pub debug_level: u8,
}

impl Default for ProperConfig {
    fn default() -> Self {
        Self {
            prune: true,
            algorithm: ProperAlgorithm::Separate,
            debug_level: 0,
        }
    }
}

impl ProperConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: ProperAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_debug_level(mut self, debug_level: u8) -> Self {
        self.debug_level = debug_level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prune_with_separate_graphs() {
        let config = ProperConfig::default();
        assert!(config.prune);
        assert_eq!(config.algorithm, ProperAlgorithm::Separate);
        assert_eq!(config.debug_level, 0);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ProperConfig::new()
            .with_prune(false)
            .with_algorithm(ProperAlgorithm::InPlace)
            .with_debug_level(3);
        assert!(!config.prune);
        assert_eq!(config.algorithm, ProperAlgorithm::InPlace);
        assert_eq!(config.debug_level, 3);
        assert_eq!(config.algorithm.to_string(), "inplace");
    }
}
