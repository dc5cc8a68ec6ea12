//! Life-like threshold rules (`B.../S...`).
//!
//! - Birth: a dead cell whose live-neighbor count is in the birth set becomes alive
//! - Survival: a live cell whose count is in the survival set stays alive
//! - Every other cell is dead in the next generation
//!
//! Conway's Game of Life is B3/S23 on the 2D Moore neighborhood. The 3D
//! default is B4/S4 on the 26-cell Moore neighborhood; 3D thresholds are a
//! modeling choice, and any other pair can be built with [`LifeRule::new`].

use rand::Rng;

use super::states::{StateLabel, StateMap};
use super::{CellRng, Rule};
use crate::automaton::grid::{Grid, Shape};
use crate::error::{ConfigError, RuleError};

#[derive(Debug, Clone, PartialEq)]
pub struct LifeRule {
    birth: Vec<u32>,
    survival: Vec<u32>,
    states: StateMap,
    alive: u8,
    dead: u8,
    initial_density: f64,
}

impl LifeRule {
    /// Rule with explicit birth and survival counts, `dead = 0`, `alive = 1`.
    pub fn new(birth: impl Into<Vec<u32>>, survival: impl Into<Vec<u32>>) -> Self {
        LifeRule {
            birth: birth.into(),
            survival: survival.into(),
            states: StateMap::life(),
            alive: 1,
            dead: 0,
            initial_density: 0.5,
        }
    }

    /// Conway's Game of Life, B3/S23.
    pub fn conway() -> Self {
        Self::new([3], [2, 3])
    }

    /// 3D Life, B4/S4.
    pub fn life_3d() -> Self {
        Self::new([4], [4])
    }

    /// Use a custom state map. It must define `Dead` and `Alive`.
    pub fn with_states(mut self, states: StateMap) -> Result<Self, ConfigError> {
        self.dead = states.require(StateLabel::Dead)?;
        self.alive = states.require(StateLabel::Alive)?;
        self.states = states;
        Ok(self)
    }

    /// Probability that a cell starts alive when the rule builds the initial grid.
    pub fn with_initial_density(mut self, density: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::InvalidProbability {
                name: "initial_density",
                value: density,
            });
        }
        self.initial_density = density;
        Ok(self)
    }

    pub fn birth(&self) -> &[u32] {
        &self.birth
    }

    pub fn survival(&self) -> &[u32] {
        &self.survival
    }

    pub fn alive_code(&self) -> u8 {
        self.alive
    }

    pub fn dead_code(&self) -> u8 {
        self.dead
    }

    pub fn initial_density(&self) -> f64 {
        self.initial_density
    }

    /// Rulestring such as `B3/S23`.
    pub fn rulestring(&self) -> String {
        let digits = |counts: &[u32]| counts.iter().map(|c| c.to_string()).collect::<String>();
        format!("B{}/S{}", digits(&self.birth), digits(&self.survival))
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeRule {
    type Aux = ();

    fn states(&self) -> &StateMap {
        &self.states
    }

    fn counted_code(&self) -> u8 {
        self.alive
    }

    fn initialize(&self, shape: &Shape, rng: &mut CellRng) -> Result<(Grid, ()), ConfigError> {
        let cells = (0..shape.len())
            .map(|_| {
                if rng.random_bool(self.initial_density) {
                    self.alive
                } else {
                    self.dead
                }
            })
            .collect();
        Ok((Grid::from_cells(shape.clone(), cells)?, ()))
    }

    fn initial_aux(&self, _shape: &Shape) {}

    fn apply(
        &self,
        grid: &Grid,
        counts: &[u32],
        _aux: &(),
        _rng: &mut CellRng,
    ) -> Result<(Grid, ()), RuleError> {
        if counts.len() != grid.len() {
            return Err(RuleError::ShapeMismatch {
                expected: grid.len(),
                got: counts.len(),
            });
        }
        let next = grid.try_map(|index, cell| {
            let count = counts[index];
            let alive = if cell == self.alive {
                self.survival.contains(&count)
            } else if cell == self.dead {
                self.birth.contains(&count)
            } else {
                return Err(RuleError::UnknownCode { index, code: cell });
            };
            Ok(if alive { self.alive } else { self.dead })
        })?;
        Ok((next, ()))
    }
}
