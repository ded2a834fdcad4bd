//! Drive a damped oscillator at a range of frequencies and compare the
//! settled amplitude against the closed-form response curve.
//!
//! Run with: `cargo run --example driven_oscillator`

use chladni::{
    AdaptiveConfig, OscillatorParams, ResonanceCurve, ResonanceModel, SolverConfig, Sweep,
};

fn main() {
    let params = OscillatorParams {
        mass: 1.0,
        spring: 9.0,
        damping: 0.4,
        initial_position: 0.0,
        initial_velocity: 0.0,
    };
    let drive = 1.0;
    let curve = ResonanceCurve::from_params(&params, drive).expect("valid parameters");

    println!("natural frequency : {:.4} rad/s", params.natural_frequency());
    println!("damped peak       : {:.4} rad/s", curve.peak_frequency());
    println!();
    println!("{:>8}  {:>12}  {:>12}  {:>9}", "omega", "integrated", "closed form", "phase");

    let solver = SolverConfig::AdaptiveRk45(AdaptiveConfig {
        tolerance: 1e-9,
        ..AdaptiveConfig::default()
    });
    let dt = 1.0 / 240.0;

    for sample in curve.samples(1.0, 5.0, 9) {
        let mut model = ResonanceModel::new(
            &[params],
            &solver,
            drive,
            Sweep::Constant(sample.omega),
        )
        .expect("valid parameters");

        // Let the transient die off (time constant 2m/c = 5 s), then track
        // the peak over one drive period.
        let settle = (50.0 / dt) as usize;
        for _ in 0..settle {
            model.step(dt);
        }
        let period = (2.0 * std::f64::consts::PI / sample.omega / dt).ceil() as usize;
        let mut peak = 0.0_f64;
        for _ in 0..period {
            model.step(dt);
            peak = peak.max(model.reference_state()[0].abs());
        }

        println!(
            "{:>8.3}  {:>12.6}  {:>12.6}  {:>8.3}°",
            sample.omega,
            peak,
            sample.amplitude,
            sample.phase.to_degrees()
        );
    }
}
