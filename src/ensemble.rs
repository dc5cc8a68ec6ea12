//! Ensembles of independently seeded realizations.
//!
//! Every realization owns its automaton, history and RNG stream. The only
//! state shared between workers is the read-only rule and kernel and, under
//! [`FailurePolicy::Strict`], a cancel flag checked before each step.
//! Results are always reported in realization-index order.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::automaton::grid::{Grid, Shape};
use crate::automaton::kernel::Kernel;
use crate::automaton::neighbors::Boundary;
use crate::automaton::stepping::CellularAutomaton;
use crate::config::{AutomatonConfig, EnsembleConfig, FailurePolicy};
use crate::error::{ConfigError, EnsembleError, Error};
use crate::rules::Rule;
use crate::stats::EnsembleSummary;

/// How a single realization ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RealizationStatus {
    Completed,
    Failed(Error),
    /// Stopped because another realization failed under the strict policy.
    Cancelled,
}

/// Outcome of one realization. The history holds every step that completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    pub index: usize,
    pub seed: u64,
    pub status: RealizationStatus,
    pub history: Vec<Grid>,
}

impl Realization {
    pub fn is_completed(&self) -> bool {
        self.status == RealizationStatus::Completed
    }

    /// Steps completed (history length minus the initial grid).
    pub fn steps_completed(&self) -> usize {
        self.history.len().saturating_sub(1)
    }
}

/// Per-realization results, indexed by realization.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleReport {
    realizations: Vec<Realization>,
}

impl EnsembleReport {
    pub fn realizations(&self) -> &[Realization] {
        &self.realizations
    }

    pub fn len(&self) -> usize {
        self.realizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realizations.is_empty()
    }

    /// One history per realization, failed or not, in index order.
    pub fn histories(&self) -> Vec<&[Grid]> {
        self.realizations
            .iter()
            .map(|r| r.history.as_slice())
            .collect()
    }

    /// Histories of completed realizations only.
    pub fn completed(&self) -> impl Iterator<Item = &Realization> {
        self.realizations.iter().filter(|r| r.is_completed())
    }

    /// Index and error of every failed realization.
    pub fn failures(&self) -> Vec<(usize, &Error)> {
        self.realizations
            .iter()
            .filter_map(|r| match &r.status {
                RealizationStatus::Failed(error) => Some((r.index, error)),
                _ => None,
            })
            .collect()
    }

    /// Indices of realizations stopped by the strict policy.
    pub fn cancelled(&self) -> Vec<usize> {
        self.realizations
            .iter()
            .filter(|r| r.status == RealizationStatus::Cancelled)
            .map(|r| r.index)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.realizations.iter().all(Realization::is_completed)
    }

    /// Mean and variance per step of the fraction of cells holding `code`,
    /// over completed realizations.
    pub fn summary(&self, code: u8) -> EnsembleSummary {
        let histories: Vec<&[Grid]> = self.completed().map(|r| r.history.as_slice()).collect();
        EnsembleSummary::from_histories(&histories, code)
    }

    /// All histories, or the first failure (failed before cancelled).
    pub fn into_result(self) -> Result<Vec<Vec<Grid>>, EnsembleError> {
        if let Some(failed) = self
            .realizations
            .iter()
            .find(|r| matches!(r.status, RealizationStatus::Failed(_)))
        {
            if let RealizationStatus::Failed(error) = &failed.status {
                return Err(EnsembleError::Realization {
                    index: failed.index,
                    source: Box::new(error.clone()),
                });
            }
        }
        if let Some(cancelled) = self
            .realizations
            .iter()
            .find(|r| r.status == RealizationStatus::Cancelled)
        {
            return Err(EnsembleError::Cancelled {
                index: cancelled.index,
                completed: cancelled.steps_completed(),
            });
        }
        Ok(self.realizations.into_iter().map(|r| r.history).collect())
    }
}

/// Runs many realizations of one configuration, varying only the seed.
pub struct Ensemble<R: Rule + Clone> {
    shape: Shape,
    kernel: Kernel,
    rule: R,
    boundary: Boundary,
    config: EnsembleConfig,
    thread_pool: rayon::ThreadPool,
}

impl<R: Rule + Clone> Ensemble<R> {
    /// Validate the shared configuration and build the worker pool.
    ///
    /// Realization 0's automaton is built once, so an initializer that
    /// produces an invalid grid fails here rather than in every worker.
    pub fn new(
        shape: Shape,
        kernel: Kernel,
        rule: R,
        boundary: Boundary,
        config: EnsembleConfig,
    ) -> Result<Self, ConfigError> {
        kernel.check_shape(&shape)?;
        rule.validate(&shape, &kernel)?;

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads.max(1));
        }
        let thread_pool = builder
            .build()
            .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;

        let ensemble = Ensemble {
            shape,
            kernel,
            rule,
            boundary,
            config,
            thread_pool,
        };
        // Realization 0 exercises the rule's initializer once up front.
        if ensemble.config.realizations > 0 {
            ensemble.automaton(0)?;
        }
        Ok(ensemble)
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Run every realization on the worker pool.
    pub fn run(&self) -> EnsembleReport {
        info!(
            realizations = self.config.realizations,
            steps = self.config.steps,
            threads = self.threads(),
            policy = ?self.config.policy,
            "Ensemble started"
        );
        let cancel = AtomicBool::new(false);
        let realizations = self.thread_pool.install(|| {
            (0..self.config.realizations)
                .into_par_iter()
                .map(|index| self.run_realization(index, &cancel))
                .collect()
        });
        self.finish(realizations)
    }

    /// Run every realization in index order on the calling thread.
    pub fn run_sequential(&self) -> EnsembleReport {
        info!(
            realizations = self.config.realizations,
            steps = self.config.steps,
            "Sequential ensemble started"
        );
        let cancel = AtomicBool::new(false);
        let realizations = (0..self.config.realizations)
            .map(|index| self.run_realization(index, &cancel))
            .collect();
        self.finish(realizations)
    }

    /// Build the automaton for realization `index` without running it.
    pub fn automaton(&self, index: usize) -> Result<CellularAutomaton<R>, ConfigError> {
        let config = AutomatonConfig::new(self.config.seed_for(index)).with_boundary(self.boundary);
        CellularAutomaton::from_rule(
            self.rule.clone(),
            self.shape.clone(),
            self.kernel.clone(),
            config,
        )
    }

    fn run_realization(&self, index: usize, cancel: &AtomicBool) -> Realization {
        let seed = self.config.seed_for(index);
        let strict = self.config.policy == FailurePolicy::Strict;
        let outcome = |status, history| Realization {
            index,
            seed,
            status,
            history,
        };

        if strict && cancel.load(Ordering::Relaxed) {
            return outcome(RealizationStatus::Cancelled, Vec::new());
        }

        let mut automaton = match self.automaton(index) {
            Ok(automaton) => automaton,
            Err(error) => {
                warn!(index, seed, %error, "Realization could not be built");
                if strict {
                    cancel.store(true, Ordering::Relaxed);
                }
                return outcome(RealizationStatus::Failed(error.into()), Vec::new());
            }
        };

        for _ in 0..self.config.steps {
            if strict && cancel.load(Ordering::Relaxed) {
                warn!(
                    index,
                    completed = automaton.generation(),
                    "Realization cancelled"
                );
                return outcome(RealizationStatus::Cancelled, automaton.into_history());
            }
            if let Err(error) = automaton.step() {
                warn!(index, seed, %error, "Realization failed");
                if strict {
                    cancel.store(true, Ordering::Relaxed);
                }
                return outcome(RealizationStatus::Failed(error.into()), automaton.into_history());
            }
        }

        outcome(RealizationStatus::Completed, automaton.into_history())
    }

    fn finish(&self, realizations: Vec<Realization>) -> EnsembleReport {
        let report = EnsembleReport { realizations };
        let failed = report.failures().len();
        let cancelled = report.cancelled().len();
        if failed == 0 && cancelled == 0 {
            info!(realizations = report.len(), "Ensemble completed");
        } else {
            warn!(
                realizations = report.len(),
                failed, cancelled, "Ensemble finished with failures"
            );
        }
        report
    }
}
