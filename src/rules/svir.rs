//! Stochastic SVIR epidemic rule.
//!
//! Each cell is Susceptible, Vaccinated, Infected, Recovered or Dead. With `k`
//! the weighted count of infected neighbors and `beta` the per-contact
//! infection rate:
//!
//! - S becomes I with probability `1 - (1 - beta)^k`
//! - V becomes I with probability `1 - (1 - beta * (1 - efficacy))^k`
//! - I dies with probability `mortality_rate`; a surviving cell recovers with
//!   probability `recovery_rate`, or unconditionally once it has been infected
//!   for `max_infectious_steps`
//! - R and Dead are absorbing
//!
//! Every S, V and I cell consumes exactly one draw per step, in cell order, so
//! a seed fixes the whole trajectory.

use rand::Rng;

use super::states::{StateLabel, StateMap};
use super::{CellRng, Rule};
use crate::automaton::grid::{Grid, Shape};
use crate::error::{ConfigError, RuleError};

/// Transition and initialization probabilities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvirParams {
    pub infection_rate: f64,
    pub vaccine_efficacy: f64,
    pub recovery_rate: f64,
    /// Per-step probability that an infected cell dies.
    pub mortality_rate: f64,
    pub initial_infection_rate: f64,
    pub initial_vaccination_rate: f64,
    /// Force recovery after this many steps infected.
    pub max_infectious_steps: Option<u32>,
}

impl Default for SvirParams {
    fn default() -> Self {
        SvirParams {
            infection_rate: 0.25,
            vaccine_efficacy: 0.8,
            recovery_rate: 0.1,
            mortality_rate: 0.0,
            initial_infection_rate: 0.05,
            initial_vaccination_rate: 0.1,
            max_infectious_steps: None,
        }
    }
}

impl SvirParams {
    pub fn with_infection_rate(mut self, rate: f64) -> Self {
        self.infection_rate = rate;
        self
    }

    pub fn with_vaccine_efficacy(mut self, efficacy: f64) -> Self {
        self.vaccine_efficacy = efficacy;
        self
    }

    pub fn with_recovery_rate(mut self, rate: f64) -> Self {
        self.recovery_rate = rate;
        self
    }

    pub fn with_mortality_rate(mut self, rate: f64) -> Self {
        self.mortality_rate = rate;
        self
    }

    pub fn with_initial_infection_rate(mut self, rate: f64) -> Self {
        self.initial_infection_rate = rate;
        self
    }

    pub fn with_initial_vaccination_rate(mut self, rate: f64) -> Self {
        self.initial_vaccination_rate = rate;
        self
    }

    pub fn with_max_infectious_steps(mut self, steps: u32) -> Self {
        self.max_infectious_steps = Some(steps);
        self
    }

    /// Check every probability lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("infection_rate", self.infection_rate),
            ("vaccine_efficacy", self.vaccine_efficacy),
            ("recovery_rate", self.recovery_rate),
            ("mortality_rate", self.mortality_rate),
            ("initial_infection_rate", self.initial_infection_rate),
            ("initial_vaccination_rate", self.initial_vaccination_rate),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Codes {
    susceptible: u8,
    vaccinated: u8,
    infected: u8,
    recovered: u8,
    dead: u8,
}

impl Codes {
    fn from_states(states: &StateMap) -> Result<Self, ConfigError> {
        Ok(Codes {
            susceptible: states.require(StateLabel::Susceptible)?,
            vaccinated: states.require(StateLabel::Vaccinated)?,
            infected: states.require(StateLabel::Infected)?,
            recovered: states.require(StateLabel::Recovered)?,
            dead: states.require(StateLabel::Dead)?,
        })
    }
}

/// Stochastic epidemic rule. Auxiliary state is the per-cell infection age.
#[derive(Debug, Clone, PartialEq)]
pub struct SvirRule {
    params: SvirParams,
    states: StateMap,
    codes: Codes,
}

impl SvirRule {
    pub fn new(params: SvirParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let states = StateMap::svir();
        let codes = Codes::from_states(&states)?;
        Ok(SvirRule {
            params,
            states,
            codes,
        })
    }

    /// Use a custom state map. It must define all five compartments.
    pub fn with_states(mut self, states: StateMap) -> Result<Self, ConfigError> {
        self.codes = Codes::from_states(&states)?;
        self.states = states;
        Ok(self)
    }

    pub fn params(&self) -> &SvirParams {
        &self.params
    }

    /// Per-contact infection rate of a vaccinated cell.
    fn vaccinated_infection_rate(&self) -> f64 {
        self.params.infection_rate * (1.0 - self.params.vaccine_efficacy)
    }

    /// Chance that at least one of `contacts` independent exposures infects.
    fn infection_probability(rate: f64, contacts: u32) -> f64 {
        if contacts == 0 {
            return 0.0;
        }
        let exponent = i32::try_from(contacts).unwrap_or(i32::MAX);
        1.0 - (1.0 - rate).powi(exponent)
    }
}

impl Rule for SvirRule {
    type Aux = Vec<u32>;

    fn states(&self) -> &StateMap {
        &self.states
    }

    fn counted_code(&self) -> u8 {
        self.codes.infected
    }

    fn initialize(
        &self,
        shape: &Shape,
        rng: &mut CellRng,
    ) -> Result<(Grid, Vec<u32>), ConfigError> {
        let codes = self.codes;
        let cells = (0..shape.len())
            .map(|_| {
                if rng.random_bool(self.params.initial_vaccination_rate) {
                    codes.vaccinated
                } else if rng.random_bool(self.params.initial_infection_rate) {
                    codes.infected
                } else {
                    codes.susceptible
                }
            })
            .collect();
        let grid = Grid::from_cells(shape.clone(), cells)?;
        Ok((grid, self.initial_aux(shape)))
    }

    fn initial_aux(&self, shape: &Shape) -> Vec<u32> {
        vec![0; shape.len()]
    }

    fn apply(
        &self,
        grid: &Grid,
        counts: &[u32],
        aux: &Vec<u32>,
        rng: &mut CellRng,
    ) -> Result<(Grid, Vec<u32>), RuleError> {
        if counts.len() != grid.len() {
            return Err(RuleError::ShapeMismatch {
                expected: grid.len(),
                got: counts.len(),
            });
        }
        if aux.len() != grid.len() {
            return Err(RuleError::AuxMismatch {
                expected: grid.len(),
                got: aux.len(),
            });
        }

        let codes = self.codes;
        let params = &self.params;
        let vaccinated_rate = self.vaccinated_infection_rate();
        // Survivors recover with `recovery_rate`; one draw decides both.
        let leave_rate =
            params.mortality_rate + (1.0 - params.mortality_rate) * params.recovery_rate;
        let mut ages = Vec::with_capacity(grid.len());

        let next = grid.try_map(|index, cell| {
            let contacts = counts[index];
            let (code, age) = if cell == codes.susceptible {
                let p = Self::infection_probability(params.infection_rate, contacts);
                if rng.random::<f64>() < p {
                    (codes.infected, 0)
                } else {
                    (codes.susceptible, 0)
                }
            } else if cell == codes.vaccinated {
                let p = Self::infection_probability(vaccinated_rate, contacts);
                if rng.random::<f64>() < p {
                    (codes.infected, 0)
                } else {
                    (codes.vaccinated, 0)
                }
            } else if cell == codes.infected {
                let age = aux[index] + 1;
                let expired = params.max_infectious_steps.is_some_and(|max| age >= max);
                let draw = rng.random::<f64>();
                if draw < params.mortality_rate {
                    (codes.dead, 0)
                } else if draw < leave_rate || expired {
                    (codes.recovered, 0)
                } else {
                    (codes.infected, age)
                }
            } else if cell == codes.recovered || cell == codes.dead {
                (cell, 0)
            } else {
                return Err(RuleError::UnknownCode { index, code: cell });
            };
            ages.push(age);
            Ok(code)
        })?;

        Ok((next, ages))
    }
}
