//! Lattice Automata - 2D/3D Cellular Automata Library
//!
//! Discrete-time automata on rectangular lattices. A kernel weights each
//! cell's neighborhood, a rule maps neighbor counts to the next grid, and the
//! automaton records every generation for renderers to consume. Stochastic
//! rules draw from a seeded RNG owned by the automaton, and ensembles run many
//! independently seeded realizations on a rayon pool.
//!
//! A small C ABI (`la_*`, see [`ffi`]) exposes a Life automaton to non-Rust
//! front ends.

pub mod automaton;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod ffi;
pub mod rules;
pub mod stats;

pub use automaton::{
    extract_region, neighbor_counts, neighbor_counts_by_state, Boundary, CellularAutomaton,
    Dimension, Grid, Kernel, Neighborhood, Phase, Region, Shape,
};
pub use config::{AutomatonConfig, EnsembleConfig, FailurePolicy};
pub use ensemble::{Ensemble, EnsembleReport, Realization, RealizationStatus};
pub use error::{ConfigError, EnsembleError, Error, Result, RuleError, StepError};
pub use rules::states::StateMap;
pub use rules::{CellRng, LifeRule, Rule, StateLabel, SvirParams, SvirRule};
pub use stats::EnsembleSummary;

#[cfg(test)]
mod tests;
