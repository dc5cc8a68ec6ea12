//! Scenario tests across the automaton, rules and ensemble runner.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use rand::Rng;

    use crate::automaton::{neighbor_counts, Boundary, CellularAutomaton, Grid, Kernel, Shape};
    use crate::config::{AutomatonConfig, EnsembleConfig, FailurePolicy};
    use crate::ensemble::{Ensemble, RealizationStatus};
    use crate::error::{ConfigError, EnsembleError, Error, RuleError, StepError};
    use crate::rules::states::StateMap;
    use crate::rules::{CellRng, LifeRule, Rule, SvirParams, SvirRule};
    use crate::stats;

    /// Life that records one RNG draw per step and fails on demand.
    #[derive(Debug, Clone)]
    struct FlakyLife {
        inner: LifeRule,
        fail: Arc<AtomicBool>,
        fail_at: Option<usize>,
    }

    impl FlakyLife {
        fn new(fail_at: Option<usize>) -> Self {
            FlakyLife {
                inner: LifeRule::conway(),
                fail: Arc::new(AtomicBool::new(false)),
                fail_at,
            }
        }
    }

    impl Rule for FlakyLife {
        type Aux = Vec<u64>;

        fn states(&self) -> &StateMap {
            self.inner.states()
        }

        fn counted_code(&self) -> u8 {
            self.inner.counted_code()
        }

        fn initialize(
            &self,
            shape: &Shape,
            rng: &mut CellRng,
        ) -> Result<(Grid, Vec<u64>), ConfigError> {
            let (grid, ()) = self.inner.initialize(shape, rng)?;
            Ok((grid, Vec::new()))
        }

        fn initial_aux(&self, _shape: &Shape) -> Vec<u64> {
            Vec::new()
        }

        fn apply(
            &self,
            grid: &Grid,
            counts: &[u32],
            aux: &Vec<u64>,
            rng: &mut CellRng,
        ) -> Result<(Grid, Vec<u64>), RuleError> {
            let draw: u64 = rng.random();
            if self.fail.load(Ordering::SeqCst) || self.fail_at == Some(aux.len()) {
                return Err(RuleError::Custom("injected failure".into()));
            }
            let (next, ()) = self.inner.apply(grid, counts, &(), rng)?;
            let mut draws = aux.clone();
            draws.push(draw);
            Ok((next, draws))
        }
    }

    fn conway(grid: Grid, boundary: Boundary) -> CellularAutomaton<LifeRule> {
        CellularAutomaton::new(
            grid,
            Kernel::moore_2d(),
            LifeRule::conway(),
            AutomatonConfig::default().with_boundary(boundary),
        )
        .unwrap()
    }

    fn glider() -> Grid {
        Grid::from_rows(&[
            [0, 1, 0, 0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0, 0, 0, 0],
            [1, 1, 1, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_block_is_still_life() {
        let block = Grid::from_rows(&[
            [0, 0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0, 0],
            [0, 1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
        ])
        .unwrap();
        let mut ca = conway(block.clone(), Boundary::Toroidal);
        ca.step_n(20).unwrap();

        assert_eq!(ca.history().len(), 21);
        assert!(ca.history().iter().all(|g| *g == block));
        assert_eq!(stats::trajectory(ca.history(), 1), vec![4; 21]);
    }

    #[test]
    fn test_glider_translates_on_torus() {
        let start = glider();
        let mut ca = conway(start.clone(), Boundary::Toroidal);

        ca.step_n(4).unwrap();
        assert_eq!(ca.grid(), &start.rolled(&[1, 1]), "glider moves one cell diagonally");

        // Wraps all the way round the 8x8 torus
        ca.step_n(28).unwrap();
        assert_eq!(ca.grid(), &start);
        assert!(stats::trajectory(ca.history(), 1).iter().all(|&n| n == 5));
    }

    #[test]
    fn test_corner_counts_depend_on_boundary() {
        let full = Grid::filled(Shape::new_2d(3, 3).unwrap(), 1);
        let kernel = Kernel::moore_2d();

        let fixed = neighbor_counts(&full, &kernel, Boundary::Fixed, 1).unwrap();
        let toroidal = neighbor_counts(&full, &kernel, Boundary::Toroidal, 1).unwrap();
        assert_eq!(fixed[0], 3);
        assert_eq!(fixed[4], 8);
        assert_eq!(toroidal, vec![8; 9]);
    }

    #[test]
    fn test_toroidal_counts_conserve_weight_3d() {
        let ca = CellularAutomaton::from_rule(
            LifeRule::life_3d(),
            Shape::new_3d(5, 6, 7).unwrap(),
            Kernel::moore_3d(),
            AutomatonConfig::new(11).with_boundary(Boundary::Toroidal),
        )
        .unwrap();
        let kernel = Kernel::moore_3d();
        let counts = neighbor_counts(ca.grid(), &kernel, Boundary::Toroidal, 1).unwrap();

        let total: u64 = counts.iter().map(|&c| c as u64).sum();
        assert_eq!(total, ca.grid().count(1) as u64 * kernel.weight_sum() as u64);
    }

    #[test]
    fn test_rejects_planar_kernel_on_volume() {
        let result = CellularAutomaton::from_rule(
            LifeRule::conway(),
            Shape::new_3d(4, 4, 4).unwrap(),
            Kernel::moore_2d(),
            AutomatonConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let svir = |seed| {
            let mut ca = CellularAutomaton::from_rule(
                SvirRule::new(SvirParams::default()).unwrap(),
                Shape::new_2d(20, 20).unwrap(),
                Kernel::von_neumann_2d(),
                AutomatonConfig::new(seed).with_boundary(Boundary::Toroidal),
            )
            .unwrap();
            ca.step_n(25).unwrap();
            ca
        };

        let a = svir(42);
        let b = svir(42);
        assert_eq!(a.history(), b.history());
        assert_eq!(a.aux(), b.aux());
        assert_ne!(a.history(), svir(43).history());
    }

    #[test]
    fn test_failed_step_changes_nothing() {
        let mut ca = CellularAutomaton::new(
            glider(),
            Kernel::moore_2d(),
            FlakyLife::new(None),
            AutomatonConfig::new(3).with_boundary(Boundary::Toroidal),
        )
        .unwrap();
        ca.step_n(2).unwrap();
        let before = ca.history().to_vec();

        ca.rule().fail.store(true, Ordering::SeqCst);
        let error = ca.step().unwrap_err();
        assert_eq!(
            error,
            StepError {
                generation: 3,
                source: RuleError::Custom("injected failure".into()),
            }
        );
        assert_eq!(ca.history(), before.as_slice());
        assert_eq!(ca.generation(), 2);
        assert_eq!(ca.aux().len(), 2);

        // The failed step consumed no randomness
        ca.rule().fail.store(false, Ordering::SeqCst);
        ca.step().unwrap();
        let mut clean = CellularAutomaton::new(
            glider(),
            Kernel::moore_2d(),
            FlakyLife::new(None),
            AutomatonConfig::new(3).with_boundary(Boundary::Toroidal),
        )
        .unwrap();
        clean.step_n(3).unwrap();
        assert_eq!(ca.aux(), clean.aux());
        assert_eq!(ca.history(), clean.history());
    }

    #[test]
    fn test_step_n_keeps_completed_steps() {
        let mut ca = CellularAutomaton::new(
            glider(),
            Kernel::moore_2d(),
            FlakyLife::new(Some(3)),
            AutomatonConfig::default().with_boundary(Boundary::Toroidal),
        )
        .unwrap();

        let error = ca.step_n(10).unwrap_err();
        assert_eq!(error.generation, 4);
        assert_eq!(ca.generation(), 3);
        assert_eq!(ca.history().len(), 4);
        assert_eq!(ca.history()[3], *ca.grid());
    }

    fn flaky_ensemble(policy: FailurePolicy) -> Ensemble<FlakyLife> {
        Ensemble::new(
            Shape::new_2d(10, 10).unwrap(),
            Kernel::moore_2d(),
            FlakyLife::new(Some(1)),
            Boundary::Toroidal,
            EnsembleConfig::new(5, 6).with_policy(policy).with_threads(2),
        )
        .unwrap()
    }

    #[test]
    fn test_lenient_ensemble_reports_every_failure() {
        let report = flaky_ensemble(FailurePolicy::Lenient).run();

        assert_eq!(report.len(), 5);
        assert_eq!(report.failures().len(), 5);
        assert!(report.cancelled().is_empty());
        for (i, realization) in report.realizations().iter().enumerate() {
            assert_eq!(realization.index, i);
            // Initial grid plus one completed step
            assert_eq!(realization.history.len(), 2);
            assert!(matches!(
                realization.status,
                RealizationStatus::Failed(Error::Step(StepError { generation: 2, .. }))
            ));
        }
    }

    #[test]
    fn test_strict_sequential_cancels_the_rest() {
        let report = flaky_ensemble(FailurePolicy::Strict).run_sequential();

        assert_eq!(report.len(), 5);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].0, 0);
        assert_eq!(report.cancelled(), vec![1, 2, 3, 4]);
        assert!(report.realizations()[1..].iter().all(|r| r.history.is_empty()));
    }

    #[test]
    fn test_strict_parallel_drops_no_slot() {
        let report = flaky_ensemble(FailurePolicy::Strict).run();

        assert_eq!(report.len(), 5);
        assert!(!report.failures().is_empty());
        for (i, realization) in report.realizations().iter().enumerate() {
            assert_eq!(realization.index, i);
            assert!(!realization.is_completed());
        }
        assert_eq!(report.failures().len() + report.cancelled().len(), 5);
        assert!(matches!(
            report.into_result(),
            Err(EnsembleError::Realization { .. })
        ));
    }

    #[test]
    fn test_svir_ensemble_statistics() {
        let ensemble = Ensemble::new(
            Shape::new_2d(16, 16).unwrap(),
            Kernel::moore_2d(),
            SvirRule::new(SvirParams::default()).unwrap(),
            Boundary::Fixed,
            EnsembleConfig::new(8, 30).with_base_seed(2024),
        )
        .unwrap();
        let report = ensemble.run();
        assert!(report.is_complete());

        let infected = report.summary(2);
        assert_eq!(infected.steps(), 31);
        assert!(infected.mean.iter().all(|m| (0.0..=1.0).contains(m)));

        // Recovered never decreases in any realization
        for history in report.histories() {
            let recovered = stats::trajectory(history, 3);
            assert!(recovered.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(ensemble.run_sequential(), report);
    }
}
