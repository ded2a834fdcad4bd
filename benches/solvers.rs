use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use chladni::{
    AdaptiveConfig, Mode, OscillatorParams, PlateConfig, ResonanceModel, SolverConfig, Sweep,
};

/// A spread of stiffnesses around the drive frequency, the workload an
/// interactive resonance demonstration actually carries per frame.
fn oscillator_bank(n: usize) -> Vec<OscillatorParams> {
    (0..n)
        .map(|i| OscillatorParams {
            mass: 1.0,
            spring: 1.0 + i as f64 * 0.5,
            damping: 0.1,
            initial_position: 0.0,
            initial_velocity: 0.0,
        })
        .collect()
}

fn bench_one_second_at_60fps(c: &mut Criterion) {
    let configs: [(&str, SolverConfig); 4] = [
        ("fixed_rk4", SolverConfig::FixedRk4),
        (
            "adaptive_euler",
            SolverConfig::AdaptiveEuler(AdaptiveConfig {
                tolerance: 1e-5,
                ..AdaptiveConfig::default()
            }),
        ),
        (
            "adaptive_rk45",
            SolverConfig::AdaptiveRk45(AdaptiveConfig {
                tolerance: 1e-9,
                ..AdaptiveConfig::default()
            }),
        ),
        (
            "modified_midpoint",
            SolverConfig::ModifiedMidpoint { substeps: 4 },
        ),
    ];

    let params = oscillator_bank(16);
    let mut group = c.benchmark_group("bank16_1s_60fps");
    for (name, config) in configs {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut model =
                    ResonanceModel::new(&params, &config, 1.0, Sweep::Constant(2.0)).unwrap();
                for _ in 0..60 {
                    model.step(black_box(1.0 / 60.0));
                }
                model.reference_state()
            })
        });
    }
    group.finish();
}

fn bench_mode_grid(c: &mut Criterion) {
    let plate = PlateConfig::default();
    let rect = Mode::new(&plate, 5, 4).unwrap();
    let circle = Mode::new(
        &PlateConfig {
            shape: chladni::PlateShape::Circle { radius: 1.0 },
            ..plate
        },
        3,
        2,
    )
    .unwrap();

    c.bench_function("rect_mode_grid_64", |b| {
        b.iter(|| black_box(&rect).grid())
    });
    c.bench_function("circle_mode_grid_64", |b| {
        b.iter(|| black_box(&circle).grid())
    });
}

criterion_group!(benches, bench_one_second_at_60fps, bench_mode_grid);
criterion_main!(benches);
