//! Automaton and ensemble configuration.
//!
//! Configuration is fixed at construction; nothing here is mutated once an
//! automaton or ensemble exists.

use crate::automaton::neighbors::Boundary;

/// Boundary handling and RNG seed for a single automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutomatonConfig {
    pub boundary: Boundary,
    pub seed: u64,
}

impl AutomatonConfig {
    pub fn new(seed: u64) -> Self {
        AutomatonConfig {
            seed,
            ..Self::default()
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// What the ensemble runner does when one realization fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Run every realization to completion and report each status.
    #[default]
    Lenient,
    /// Stop the remaining realizations after the first failure.
    Strict,
}

/// Fan-out parameters for an ensemble.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnsembleConfig {
    pub realizations: usize,
    pub steps: usize,
    /// Realization `i` is seeded with `base_seed + i` (wrapping).
    pub base_seed: u64,
    pub policy: FailurePolicy,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        EnsembleConfig {
            realizations: 1,
            steps: 0,
            base_seed: 0,
            policy: FailurePolicy::Lenient,
            threads: None,
        }
    }
}

impl EnsembleConfig {
    pub fn new(realizations: usize, steps: usize) -> Self {
        EnsembleConfig {
            realizations,
            steps,
            ..Self::default()
        }
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Seed for realization `index`.
    pub fn seed_for(&self, index: usize) -> u64 {
        self.base_seed.wrapping_add(index as u64)
    }
}
