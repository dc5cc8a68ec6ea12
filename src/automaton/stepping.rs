//! The stepping engine.
//!
//! An automaton owns its grid, the rule's auxiliary state, a seeded RNG and
//! the history of every generation. Each step counts neighbors, applies the
//! rule, checks the result and only then commits it, so a failing step leaves
//! the automaton exactly as it was.

use rand::SeedableRng;
use tracing::{debug, trace};

use super::grid::{Grid, Shape};
use super::kernel::Kernel;
use super::neighbors::count_code;
use crate::config::AutomatonConfig;
use crate::error::{ConfigError, RuleError, StepError};
use crate::rules::{CellRng, Rule};

/// Lifecycle of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// History holds only the initial grid.
    Initialized,
    /// At least one step has completed.
    Stepped,
}

pub struct CellularAutomaton<R: Rule> {
    grid: Grid,
    aux: R::Aux,
    kernel: Kernel,
    rule: R,
    config: AutomatonConfig,
    rng: CellRng,
    history: Vec<Grid>,
}

impl<R: Rule> CellularAutomaton<R> {
    /// Build an automaton from an explicit initial grid.
    ///
    /// Fails if the kernel does not match the grid's dimensionality or the grid
    /// holds a code the rule does not define.
    pub fn new(
        grid: Grid,
        kernel: Kernel,
        rule: R,
        config: AutomatonConfig,
    ) -> Result<Self, ConfigError> {
        kernel.check_shape(grid.shape())?;
        rule.validate(grid.shape(), &kernel)?;
        rule.states().validate_grid(&grid)?;

        let aux = rule.initial_aux(grid.shape());
        let rng = CellRng::seed_from_u64(config.seed);
        Ok(Self::assemble(grid, aux, kernel, rule, config, rng))
    }

    /// Build an automaton whose initial grid comes from the rule's initializer.
    ///
    /// The initializer draws from the automaton's own RNG, so the seed fixes
    /// both the initial grid and every later step.
    pub fn from_rule(
        rule: R,
        shape: Shape,
        kernel: Kernel,
        config: AutomatonConfig,
    ) -> Result<Self, ConfigError> {
        kernel.check_shape(&shape)?;
        rule.validate(&shape, &kernel)?;

        let mut rng = CellRng::seed_from_u64(config.seed);
        let (grid, aux) = rule.initialize(&shape, &mut rng)?;
        if grid.shape() != &shape {
            return Err(ConfigError::CellCount {
                expected: shape.len(),
                got: grid.len(),
            });
        }
        rule.states().validate_grid(&grid)?;
        Ok(Self::assemble(grid, aux, kernel, rule, config, rng))
    }

    fn assemble(
        grid: Grid,
        aux: R::Aux,
        kernel: Kernel,
        rule: R,
        config: AutomatonConfig,
        rng: CellRng,
    ) -> Self {
        debug!(
            shape = %grid.shape(),
            boundary = ?config.boundary,
            seed = config.seed,
            kernel_weight = kernel.weight_sum(),
            "Automaton created"
        );
        let history = vec![grid.clone()];
        CellularAutomaton {
            grid,
            aux,
            kernel,
            rule,
            config,
            rng,
            history,
        }
    }

    /// Advance one generation and return the new grid.
    ///
    /// On error nothing changes: grid, auxiliary state, RNG position and
    /// history are all left as they were before the call.
    pub fn step(&mut self) -> Result<&Grid, StepError> {
        let generation = self.generation() + 1;
        let fail = |source: RuleError| StepError { generation, source };

        let counts = count_code(
            &self.grid,
            &self.kernel,
            self.config.boundary,
            self.rule.counted_code(),
        );

        let mut rng = self.rng.clone();
        let (next, aux) = self
            .rule
            .apply(&self.grid, &counts, &self.aux, &mut rng)
            .map_err(fail)?;

        if next.shape() != self.grid.shape() {
            return Err(fail(RuleError::ShapeMismatch {
                expected: self.grid.len(),
                got: next.len(),
            }));
        }
        if let Some((index, code)) = self.rule.states().first_unknown(&next) {
            return Err(fail(RuleError::UnknownCode { index, code }));
        }

        trace!(
            generation,
            population = next.count(self.rule.counted_code()),
            "Step committed"
        );

        self.rng = rng;
        self.aux = aux;
        self.history.push(next.clone());
        self.grid = next;
        Ok(&self.grid)
    }

    /// Advance `count` generations.
    ///
    /// Stops at the first failing step; every step completed before it stays
    /// in the history.
    pub fn step_n(&mut self, count: usize) -> Result<&Grid, StepError> {
        for _ in 0..count {
            self.step()?;
        }
        Ok(&self.grid)
    }

    /// Every grid produced so far, starting with the initial grid.
    pub fn history(&self) -> &[Grid] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Grid> {
        self.history
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn aux(&self) -> &R::Aux {
        &self.aux
    }

    /// Number of completed steps.
    pub fn generation(&self) -> u64 {
        (self.history.len() - 1) as u64
    }

    pub fn phase(&self) -> Phase {
        if self.history.len() > 1 {
            Phase::Stepped
        } else {
            Phase::Initialized
        }
    }

    pub fn shape(&self) -> &Shape {
        self.grid.shape()
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn config(&self) -> &AutomatonConfig {
        &self.config
    }
}
