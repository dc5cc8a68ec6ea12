//! Per-step aggregates over histories.
//!
//! These are the numbers renderers and sonifiers consume: live-cell counts
//! per frame, compartment fractions, and ensemble mean/variance bands.

use crate::automaton::grid::Grid;
use crate::rules::states::{StateLabel, StateMap};

/// Number of cells holding `code`.
pub fn census(grid: &Grid, code: u8) -> usize {
    grid.count(code)
}

/// Census of `code` for every snapshot in a history.
pub fn trajectory(history: &[Grid], code: u8) -> Vec<usize> {
    history.iter().map(|grid| census(grid, code)).collect()
}

/// Fraction of cells in each labeled state, in state-map order.
pub fn fractions(grid: &Grid, states: &StateMap) -> Vec<(StateLabel, f64)> {
    let total = grid.len() as f64;
    states
        .iter()
        .map(|(label, code)| (label, census(grid, code) as f64 / total))
        .collect()
}

/// Mean and population variance, per step, of the fraction of cells holding
/// one code across an ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
    /// Realizations contributing to each step.
    pub members: Vec<usize>,
}

impl EnsembleSummary {
    /// Step `t` aggregates every history that has a snapshot at `t`.
    pub fn from_histories(histories: &[&[Grid]], code: u8) -> Self {
        let steps = histories.iter().map(|h| h.len()).max().unwrap_or(0);
        let mut summary = EnsembleSummary {
            mean: Vec::with_capacity(steps),
            variance: Vec::with_capacity(steps),
            members: Vec::with_capacity(steps),
        };

        for t in 0..steps {
            let samples: Vec<f64> = histories
                .iter()
                .filter_map(|h| h.get(t))
                .map(|grid| census(grid, code) as f64 / grid.len() as f64)
                .collect();
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

            summary.mean.push(mean);
            summary.variance.push(variance);
            summary.members.push(samples.len());
        }
        summary
    }

    pub fn steps(&self) -> usize {
        self.mean.len()
    }

    /// Standard deviation per step.
    pub fn std_dev(&self) -> Vec<f64> {
        self.variance.iter().map(|v| v.sqrt()).collect()
    }
}
