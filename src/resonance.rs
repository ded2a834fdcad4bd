//! Driven, damped oscillator bank.
//!
//! The resonance model owns N spring-mass-damper oscillators sharing one
//! driving signal `A·cos(ω(t)·t)`. Each oscillator carries its own
//! parameters and its own solver strategy; a `step(dt)` advances every
//! 2-vector state `[position, velocity]` by exactly `dt` and then the model
//! time. Negative `dt` rewinds a single step through the same code path.
//!
//! Equation of motion per oscillator:
//!
//! ```text
//! m·x'' + c·x' + k·x = A·cos(ω(t)·t)
//! ```
//!
//! Every exposed snapshot is a pure function of the inputs accumulated since
//! the last [`ResonanceModel::reset`]; there is no hidden state.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::solver::{Accuracy, OdeModel, Solver, SolverConfig};
use crate::sweep::Sweep;

/// Physical parameters and initial conditions of one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Mass (kg), strictly positive
    pub mass: f64,
    /// Spring constant (N/m), strictly positive
    pub spring: f64,
    /// Viscous damping coefficient (N·s/m), non-negative
    pub damping: f64,
    /// Position at t = 0 (m)
    pub initial_position: f64,
    /// Velocity at t = 0 (m/s)
    pub initial_velocity: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            spring: 1.0,
            damping: 0.0,
            initial_position: 0.0,
            initial_velocity: 0.0,
        }
    }
}

impl OscillatorParams {
    /// Validate physical plausibility.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("mass", self.mass),
            ("spring constant", self.spring),
            ("damping coefficient", self.damping),
            ("initial position", self.initial_position),
            ("initial velocity", self.initial_velocity),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }
        if self.mass <= 0.0 {
            return Err(ParameterError::NonPositiveMass { value: self.mass });
        }
        if self.spring <= 0.0 {
            return Err(ParameterError::NonPositiveSpring { value: self.spring });
        }
        if self.damping < 0.0 {
            return Err(ParameterError::NegativeDamping {
                value: self.damping,
            });
        }
        Ok(())
    }

    /// Undamped natural angular frequency `ω0 = sqrt(k/m)`.
    pub fn natural_frequency(&self) -> f64 {
        (self.spring / self.mass).sqrt()
    }
}

/// One oscillator: parameters plus its live `[position, velocity]` state.
#[derive(Debug, Clone)]
struct Oscillator {
    params: OscillatorParams,
    state: [f64; 2],
}

impl Oscillator {
    fn new(params: OscillatorParams) -> Self {
        let state = [params.initial_position, params.initial_velocity];
        Self { params, state }
    }
}

/// The driven EOM of a single oscillator, rearranged to first order.
///
/// State `[x, v]`, derivative `[v, (A·cos(ω(t)·t) − c·v − k·x) / m]`. The
/// forcing term is evaluated at the instantaneous time the solver asks for,
/// so internal sub-steps see a consistent drive.
struct DrivenOscillator<'a> {
    mass: f64,
    damping: f64,
    spring: f64,
    amplitude: f64,
    sweep: &'a Sweep,
}

impl OdeModel<2> for DrivenOscillator<'_> {
    fn deriv(&self, t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        let force = self.amplitude * (self.sweep.omega(t) * t).cos();
        dydt[0] = y[1];
        dydt[1] = (force - self.damping * y[1] - self.spring * y[0]) / self.mass;
    }
}

/// Per-tick anomaly report from [`ResonanceModel::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    /// At least one solver hit its retry cap or minimum step this tick
    pub degraded: bool,
    /// At least one oscillator produced a non-finite state this tick and
    /// was rolled back
    pub instability: bool,
}

/// Sticky anomaly flags since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStatus {
    /// Any tick since reset reported degraded accuracy
    pub degraded: bool,
    /// Any tick since reset detected and rolled back a non-finite state
    pub instability: bool,
}

/// Bank of driven, damped oscillators sharing one forcing signal.
///
/// Index 0 is the reference oscillator. Oscillator state lives in flat,
/// insertion-ordered storage owned exclusively by the model.
#[derive(Debug, Clone)]
pub struct ResonanceModel {
    oscillators: Vec<Oscillator>,
    solvers: Vec<Solver>,
    amplitude: f64,
    sweep: Sweep,
    t: f64,
    status: ModelStatus,
}

impl ResonanceModel {
    /// Build a model from validated oscillator parameters, one shared solver
    /// configuration, a driving amplitude, and a frequency schedule.
    pub fn new(
        params: &[OscillatorParams],
        solver: &SolverConfig,
        amplitude: f64,
        sweep: Sweep,
    ) -> Result<Self, ParameterError> {
        if params.is_empty() {
            return Err(ParameterError::EmptyOscillatorBank);
        }
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ParameterError::NonFinite {
                name: "driving amplitude",
                value: amplitude,
            });
        }
        sweep.validate()?;

        let mut oscillators = Vec::with_capacity(params.len());
        let mut solvers = Vec::with_capacity(params.len());
        for p in params {
            p.validate()?;
            oscillators.push(Oscillator::new(*p));
            solvers.push(Solver::from_config(solver)?);
        }

        Ok(Self {
            oscillators,
            solvers,
            amplitude,
            sweep,
            t: 0.0,
            status: ModelStatus::default(),
        })
    }

    /// Advance every oscillator by exactly `dt` seconds (negative `dt`
    /// rewinds one step), then advance model time.
    pub fn step(&mut self, dt: f64) -> StepFlags {
        let mut flags = StepFlags::default();
        if dt == 0.0 {
            return flags;
        }

        for (osc, solver) in self.oscillators.iter_mut().zip(self.solvers.iter()) {
            let system = DrivenOscillator {
                mass: osc.params.mass,
                damping: osc.params.damping,
                spring: osc.params.spring,
                amplitude: self.amplitude,
                sweep: &self.sweep,
            };
            let outcome = solver.step(&system, self.t, &osc.state, dt);

            if outcome.y.iter().all(|v| v.is_finite()) {
                osc.state = outcome.y;
            } else {
                // Roll back to the last finite state and keep going; the
                // host may call reset() to fully recover
                warn!(
                    "non-finite oscillator state at t = {}, rolled back",
                    self.t
                );
                flags.instability = true;
            }
            if outcome.accuracy == Accuracy::Degraded {
                flags.degraded = true;
            }
        }

        self.t += dt;
        self.status.degraded |= flags.degraded;
        self.status.instability |= flags.instability;
        flags
    }

    /// Restore every oscillator to its originally configured state and
    /// `t = 0`, bit-for-bit, clearing all status flags. All-or-nothing.
    pub fn reset(&mut self) {
        for osc in &mut self.oscillators {
            osc.state = [osc.params.initial_position, osc.params.initial_velocity];
        }
        self.t = 0.0;
        self.status = ModelStatus::default();
    }

    /// Elapsed simulation time since the last reset.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Number of oscillators.
    pub fn len(&self) -> usize {
        self.oscillators.len()
    }

    /// Whether the bank is empty (never true for a constructed model).
    pub fn is_empty(&self) -> bool {
        self.oscillators.is_empty()
    }

    /// State `[position, velocity]` of oscillator `index`.
    pub fn state(&self, index: usize) -> Option<[f64; 2]> {
        self.oscillators.get(index).map(|o| o.state)
    }

    /// State of the reference oscillator (index 0).
    pub fn reference_state(&self) -> [f64; 2] {
        self.oscillators[0].state
    }

    /// Snapshot of all oscillator states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.oscillators.iter().map(|o| o.state)
    }

    /// Parameters of oscillator `index`.
    pub fn params(&self, index: usize) -> Option<&OscillatorParams> {
        self.oscillators.get(index).map(|o| &o.params)
    }

    /// Natural frequency `sqrt(k/m)` of oscillator `index`.
    pub fn natural_frequency(&self, index: usize) -> Option<f64> {
        self.oscillators
            .get(index)
            .map(|o| o.params.natural_frequency())
    }

    /// Current driving amplitude.
    pub fn drive_amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Replace the driving amplitude (control-panel slider).
    pub fn set_drive_amplitude(&mut self, amplitude: f64) -> Result<(), ParameterError> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ParameterError::NonFinite {
                name: "driving amplitude",
                value: amplitude,
            });
        }
        self.amplitude = amplitude;
        Ok(())
    }

    /// Replace the frequency schedule.
    pub fn set_sweep(&mut self, sweep: Sweep) -> Result<(), ParameterError> {
        sweep.validate()?;
        self.sweep = sweep;
        Ok(())
    }

    /// Current frequency schedule.
    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    /// Swap the solver strategy of oscillator `index`.
    pub fn set_solver(&mut self, index: usize, config: &SolverConfig) -> Result<(), ParameterError> {
        if index >= self.solvers.len() {
            return Err(ParameterError::BadSolverConfig {
                reason: "oscillator index out of range",
            });
        }
        self.solvers[index] = Solver::from_config(config)?;
        Ok(())
    }

    /// Solver variant name of oscillator `index`.
    pub fn solver_name(&self, index: usize) -> Option<&'static str> {
        self.solvers.get(index).map(|s| s.name())
    }

    /// Sticky anomaly flags since the last reset.
    pub fn status(&self) -> ModelStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::AdaptiveConfig;

    fn undriven(mass: f64, spring: f64, x0: f64) -> OscillatorParams {
        OscillatorParams {
            mass,
            spring,
            damping: 0.0,
            initial_position: x0,
            initial_velocity: 0.0,
        }
    }

    #[test]
    fn construction_validates_parameters() {
        let bad_mass = OscillatorParams {
            mass: 0.0,
            ..OscillatorParams::default()
        };
        assert!(matches!(
            ResonanceModel::new(
                &[bad_mass],
                &SolverConfig::FixedRk4,
                0.0,
                Sweep::default()
            ),
            Err(ParameterError::NonPositiveMass { .. })
        ));

        let bad_damping = OscillatorParams {
            damping: -0.1,
            ..OscillatorParams::default()
        };
        assert!(matches!(
            ResonanceModel::new(
                &[bad_damping],
                &SolverConfig::FixedRk4,
                0.0,
                Sweep::default()
            ),
            Err(ParameterError::NegativeDamping { .. })
        ));

        assert!(matches!(
            ResonanceModel::new(&[], &SolverConfig::FixedRk4, 0.0, Sweep::default()),
            Err(ParameterError::EmptyOscillatorBank)
        ));
    }

    #[test]
    fn free_oscillation_at_natural_frequency() {
        // No drive, no damping, released from rest at x0: the oscillator
        // swings at ω0 = sqrt(k/m) with amplitude x0
        for &(m, k) in &[(1.0, 1.0), (2.0, 8.0), (0.5, 4.5)] {
            let x0 = 0.7;
            let params = undriven(m, k, x0);
            let omega0 = params.natural_frequency();
            let cfg = AdaptiveConfig {
                tolerance: 1e-10,
                ..AdaptiveConfig::default()
            };
            let mut model = ResonanceModel::new(
                &[params],
                &SolverConfig::AdaptiveRk45(cfg),
                0.0,
                Sweep::Constant(0.0),
            )
            .unwrap();

            // One full period in 256 ticks
            let period = 2.0 * std::f64::consts::PI / omega0;
            let dt = period / 256.0;
            let mut max_x: f64 = 0.0;
            for _ in 0..256 {
                model.step(dt);
                max_x = max_x.max(model.reference_state()[0].abs());
            }

            let [x, v] = model.reference_state();
            assert!(
                (x - x0).abs() < 1e-6,
                "m={}, k={}: x(T) = {}, expected {}",
                m,
                k,
                x,
                x0
            );
            assert!(v.abs() < 1e-5 * omega0, "v(T) = {}", v);
            assert!((max_x - x0).abs() < 1e-4, "amplitude {} != {}", max_x, x0);
        }
    }

    #[test]
    fn reset_is_bit_exact() {
        let params = [
            OscillatorParams {
                mass: 1.0,
                spring: 2.0,
                damping: 0.3,
                initial_position: 0.25,
                initial_velocity: -0.5,
            },
            OscillatorParams {
                mass: 3.0,
                spring: 1.5,
                damping: 0.0,
                initial_position: -1.0,
                initial_velocity: 0.0,
            },
        ];
        let mut model = ResonanceModel::new(
            &params,
            &SolverConfig::AdaptiveRk45(AdaptiveConfig::default()),
            1.0,
            Sweep::Constant(1.3),
        )
        .unwrap();

        let fresh: Vec<[f64; 2]> = model.states().collect();

        for _ in 0..137 {
            model.step(0.01);
        }
        model.reset();

        assert_eq!(model.time(), 0.0);
        let after_reset: Vec<[f64; 2]> = model.states().collect();
        assert_eq!(fresh, after_reset);
        assert_eq!(model.status(), ModelStatus::default());

        // Evolution after reset matches evolution after construction
        let mut replay = ResonanceModel::new(
            &params,
            &SolverConfig::AdaptiveRk45(AdaptiveConfig::default()),
            1.0,
            Sweep::Constant(1.3),
        )
        .unwrap();
        for _ in 0..10 {
            model.step(0.01);
            replay.step(0.01);
        }
        let a: Vec<[f64; 2]> = model.states().collect();
        let b: Vec<[f64; 2]> = replay.states().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn forward_then_backward_returns_near_start() {
        let params = undriven(1.0, 4.0, 0.5);
        let mut model = ResonanceModel::new(
            &[params],
            &SolverConfig::FixedRk4,
            0.4,
            Sweep::Constant(1.0),
        )
        .unwrap();

        let start = model.reference_state();
        model.step(0.01);
        model.step(-0.01);

        let [x, v] = model.reference_state();
        assert!((x - start[0]).abs() < 1e-10, "x drift {:e}", x - start[0]);
        assert!((v - start[1]).abs() < 1e-10, "v drift {:e}", v - start[1]);
        assert!(model.time().abs() < 1e-15);
    }

    #[test]
    fn instability_rolls_back_and_flags() {
        // Enormous stiffness with a fixed step makes RK4 blow up fast
        let params = OscillatorParams {
            mass: 1e-6,
            spring: 1e12,
            damping: 0.0,
            initial_position: 1.0,
            initial_velocity: 0.0,
        };
        let mut model = ResonanceModel::new(
            &[params],
            &SolverConfig::FixedRk4,
            0.0,
            Sweep::Constant(0.0),
        )
        .unwrap();

        for _ in 0..200 {
            model.step(1.0);
        }

        assert!(model.status().instability, "instability flag not raised");
        let [x, v] = model.reference_state();
        assert!(x.is_finite() && v.is_finite(), "state not rolled back");

        // Full recovery via reset
        model.reset();
        assert!(!model.status().instability);
        assert_eq!(model.reference_state(), [1.0, 0.0]);
    }

    #[test]
    fn degraded_accuracy_is_reported_per_tick() {
        let cfg = AdaptiveConfig {
            tolerance: 1e-15,
            max_attempts: 2,
            ..AdaptiveConfig::default()
        };
        let params = undriven(1.0, 100.0, 1.0);
        let mut model = ResonanceModel::new(
            &[params],
            &SolverConfig::AdaptiveEuler(cfg),
            0.0,
            Sweep::Constant(0.0),
        )
        .unwrap();

        let flags = model.step(0.1);
        assert!(flags.degraded);
        assert!(model.status().degraded);
    }

    #[test]
    fn per_oscillator_solver_swap() {
        let params = [OscillatorParams::default(), OscillatorParams::default()];
        let mut model =
            ResonanceModel::new(&params, &SolverConfig::FixedRk4, 0.0, Sweep::default()).unwrap();
        assert_eq!(model.solver_name(0), Some("fixed-rk4"));

        model
            .set_solver(1, &SolverConfig::ModifiedMidpoint { substeps: 4 })
            .unwrap();
        assert_eq!(model.solver_name(1), Some("modified-midpoint"));
        assert!(model.set_solver(5, &SolverConfig::FixedRk4).is_err());
    }
}
