//! Benchmarks for stepping and ensemble runs.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_automata::{
    neighbor_counts, AutomatonConfig, Boundary, CellularAutomaton, Ensemble, EnsembleConfig,
    Kernel, LifeRule, Shape, SvirParams, SvirRule,
};

fn bench_life_2d(c: &mut Criterion) {
    c.bench_function("life_256x256_10_steps", |b| {
        b.iter(|| {
            let mut ca = CellularAutomaton::from_rule(
                LifeRule::conway(),
                Shape::new_2d(256, 256).unwrap(),
                Kernel::moore_2d(),
                AutomatonConfig::new(1).with_boundary(Boundary::Toroidal),
            )
            .unwrap();
            ca.step_n(10).unwrap();
            black_box(ca.generation());
        });
    });
}

fn bench_counts_3d(c: &mut Criterion) {
    let ca = CellularAutomaton::from_rule(
        LifeRule::life_3d(),
        Shape::new_3d(64, 64, 64).unwrap(),
        Kernel::moore_3d(),
        AutomatonConfig::new(1),
    )
    .unwrap();
    let kernel = Kernel::moore_3d();

    c.bench_function("moore_counts_64cubed", |b| {
        b.iter(|| black_box(neighbor_counts(ca.grid(), &kernel, Boundary::Toroidal, 1).unwrap()));
    });
}

fn bench_svir_ensemble(c: &mut Criterion) {
    let ensemble = Ensemble::new(
        Shape::new_2d(64, 64).unwrap(),
        Kernel::moore_2d(),
        SvirRule::new(SvirParams::default()).unwrap(),
        Boundary::Fixed,
        EnsembleConfig::new(16, 50),
    )
    .unwrap();

    c.bench_function("svir_ensemble_16x50", |b| {
        b.iter(|| black_box(ensemble.run().len()));
    });
}

criterion_group!(benches, bench_life_2d, bench_counts_3d, bench_svir_ensemble);
criterion_main!(benches);
