//! Error types for lattice-automata.

use thiserror::Error;

use crate::automaton::grid::Dimension;
use crate::rules::states::StateLabel;

/// Errors raised while building an automaton, kernel, rule or ensemble.
///
/// These are never recoverable: construction fails before any simulation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Only 2D and 3D grids are supported.
    #[error("unsupported rank {0}: expected 2 or 3 dimensions")]
    UnsupportedRank(usize),

    /// A shape extent was zero.
    #[error("shape extent on axis {axis} must be positive")]
    EmptyExtent {
        /// Axis index in the caller's shape.
        axis: usize,
    },

    /// Kernel and grid disagree on dimensionality.
    #[error("kernel is {kernel} but grid is {grid}")]
    DimensionMismatch {
        /// Kernel dimensionality.
        kernel: Dimension,
        /// Grid dimensionality.
        grid: Dimension,
    },

    /// A custom kernel had the wrong number of weights.
    #[error("{dimension} kernel needs {expected} weights, got {got}")]
    KernelSize {
        /// Requested dimensionality.
        dimension: Dimension,
        /// Required weight count.
        expected: usize,
        /// Supplied weight count.
        got: usize,
    },

    /// The center weight of a kernel must be zero.
    #[error("kernel center weight must be 0, got {0}")]
    KernelCenter(u8),

    /// A probability parameter was outside `[0, 1]`.
    #[error("parameter `{name}` must be in [0, 1], got {value}")]
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The same label appears twice in a state map.
    #[error("state label {0} mapped more than once")]
    DuplicateLabel(StateLabel),

    /// Two labels share a cell code.
    #[error("cell code {0} mapped to more than one label")]
    DuplicateCode(u8),

    /// A rule needs a label that the state map does not define.
    #[error("state map is missing required label {0}")]
    MissingState(StateLabel),

    /// An initial grid contains a code the rule does not know.
    #[error("cell {index} holds code {code}, which the state map does not define")]
    UnknownCode {
        /// Linear cell index.
        index: usize,
        /// Offending code.
        code: u8,
    },

    /// A grid was built from a buffer of the wrong length.
    #[error("grid of {expected} cells cannot be built from {got} values")]
    CellCount {
        /// Cells implied by the shape.
        expected: usize,
        /// Values supplied.
        got: usize,
    },

    /// The ensemble worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Errors raised by a rule while computing the next generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// A cell holds a code outside the rule's state map.
    #[error("cell {index} holds undefined code {code}")]
    UnknownCode {
        /// Linear cell index.
        index: usize,
        /// Offending code.
        code: u8,
    },

    /// The rule returned a grid whose shape differs from its input.
    #[error("rule returned {got} cells for a grid of {expected}")]
    ShapeMismatch {
        /// Cells in the current grid.
        expected: usize,
        /// Cells in the returned grid.
        got: usize,
    },

    /// Auxiliary state does not line up with the grid.
    #[error("auxiliary state has {got} entries for a grid of {expected}")]
    AuxMismatch {
        /// Cells in the grid.
        expected: usize,
        /// Entries in the auxiliary state.
        got: usize,
    },

    /// Failure reported by a user-defined rule.
    #[error("{0}")]
    Custom(String),
}

/// A rule failure attached to the step that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("step to generation {generation} failed: {source}")]
pub struct StepError {
    /// The generation the failed step would have produced.
    pub generation: u64,
    /// Underlying rule failure.
    #[source]
    pub source: RuleError,
}

/// Errors reported by the ensemble runner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnsembleError {
    /// The shared configuration is invalid.
    #[error("invalid ensemble configuration: {0}")]
    Config(#[from] ConfigError),

    /// One realization failed; others are unaffected.
    #[error("realization {index} failed: {source}")]
    Realization {
        /// Realization index.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A realization was stopped before finishing (strict policy).
    #[error("realization {index} was cancelled after {completed} steps")]
    Cancelled {
        /// Realization index.
        index: usize,
        /// Steps completed before cancellation.
        completed: usize,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Construction-time misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulation-time rule failure.
    #[error(transparent)]
    Step(#[from] StepError),

    /// Ensemble failure.
    #[error(transparent)]
    Ensemble(#[from] EnsembleError),
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
