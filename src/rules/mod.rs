//! Update rules.
//!
//! A rule maps the current grid, its neighbor counts and the rule's auxiliary
//! state to the next grid and auxiliary state. Rules also build the initial
//! grid, so an automaton can be constructed from a rule and a shape alone.
//!
//! Randomness always comes from the [`CellRng`] owned by the automaton being
//! stepped; rules hold no random source of their own.

pub mod life;
pub mod states;
pub mod svir;

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::automaton::grid::{Grid, Shape};
use crate::automaton::kernel::Kernel;
use crate::error::{ConfigError, RuleError};
use states::StateMap;

pub use life::LifeRule;
pub use states::StateLabel;
pub use svir::{SvirParams, SvirRule};

/// Random source threaded through initialization and stepping.
pub type CellRng = ChaCha8Rng;

/// A cellular automaton update rule.
pub trait Rule: Send + Sync {
    /// Per-automaton state carried between steps alongside the grid.
    type Aux: Clone + Send + fmt::Debug;

    /// Labels this rule understands and the codes they map to.
    fn states(&self) -> &StateMap;

    /// Code whose neighbors are counted before each step.
    fn counted_code(&self) -> u8;

    /// Build the step-0 grid and auxiliary state for `shape`.
    fn initialize(
        &self,
        shape: &Shape,
        rng: &mut CellRng,
    ) -> Result<(Grid, Self::Aux), ConfigError>;

    /// Auxiliary state to pair with a caller-supplied initial grid.
    fn initial_aux(&self, shape: &Shape) -> Self::Aux;

    /// Reject shapes or kernels the rule cannot work with.
    fn validate(&self, _shape: &Shape, _kernel: &Kernel) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Compute the next grid. `counts` holds one weighted neighbor count per cell.
    fn apply(
        &self,
        grid: &Grid,
        counts: &[u32],
        aux: &Self::Aux,
        rng: &mut CellRng,
    ) -> Result<(Grid, Self::Aux), RuleError>;
}
