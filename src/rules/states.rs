//! State labels and the label-to-code mapping rules are parametrized by.

use std::fmt;

use crate::automaton::grid::Grid;
use crate::error::ConfigError;

/// Symbolic cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateLabel {
    Dead,
    Alive,
    Susceptible,
    Vaccinated,
    Infected,
    Recovered,
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateLabel::Dead => "dead",
            StateLabel::Alive => "alive",
            StateLabel::Susceptible => "susceptible",
            StateLabel::Vaccinated => "vaccinated",
            StateLabel::Infected => "infected",
            StateLabel::Recovered => "recovered",
        };
        f.write_str(name)
    }
}

/// Validated mapping from labels to the codes stored in a [`Grid`].
///
/// Labels and codes are both unique.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateMap {
    entries: Vec<(StateLabel, u8)>,
}

impl StateMap {
    /// Build a map, rejecting duplicate labels or codes.
    pub fn new<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (StateLabel, u8)>,
    {
        let mut map = StateMap {
            entries: Vec::new(),
        };
        for (label, code) in entries {
            if map.code(label).is_some() {
                return Err(ConfigError::DuplicateLabel(label));
            }
            if map.label(code).is_some() {
                return Err(ConfigError::DuplicateCode(code));
            }
            map.entries.push((label, code));
        }
        Ok(map)
    }

    /// `dead = 0`, `alive = 1`.
    pub fn life() -> Self {
        StateMap {
            entries: vec![(StateLabel::Dead, 0), (StateLabel::Alive, 1)],
        }
    }

    /// `susceptible = 0`, `vaccinated = 1`, `infected = 2`, `recovered = 3`, `dead = 4`.
    pub fn svir() -> Self {
        StateMap {
            entries: vec![
                (StateLabel::Susceptible, 0),
                (StateLabel::Vaccinated, 1),
                (StateLabel::Infected, 2),
                (StateLabel::Recovered, 3),
                (StateLabel::Dead, 4),
            ],
        }
    }

    pub fn code(&self, label: StateLabel) -> Option<u8> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, code)| code)
    }

    pub fn label(&self, code: u8) -> Option<StateLabel> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|&(label, _)| label)
    }

    /// Code for a label the caller cannot work without.
    pub fn require(&self, label: StateLabel) -> Result<u8, ConfigError> {
        self.code(label).ok_or(ConfigError::MissingState(label))
    }

    pub fn contains_code(&self, code: u8) -> bool {
        self.label(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateLabel, u8)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First cell whose code is not mapped, as `(index, code)`.
    pub fn first_unknown(&self, grid: &Grid) -> Option<(usize, u8)> {
        grid.cells()
            .iter()
            .enumerate()
            .find(|&(_, &code)| !self.contains_code(code))
            .map(|(index, &code)| (index, code))
    }

    /// Fail if any cell holds an unmapped code.
    pub fn validate_grid(&self, grid: &Grid) -> Result<(), ConfigError> {
        match self.first_unknown(grid) {
            Some((index, code)) => Err(ConfigError::UnknownCode { index, code }),
            None => Ok(()),
        }
    }
}
