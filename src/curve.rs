//! Closed-form steady-state resonance response.
//!
//! For `m·x'' + c·x' + k·x = A·cos(ω·t)` the steady-state solution after
//! transient decay is `x(t) = X(ω)·cos(ω·t − φ(ω))` with
//!
//! ```text
//! X(ω) = A / sqrt((k − m·ω²)² + (c·ω)²)
//! φ(ω) = atan2(c·ω, k − m·ω²)
//! ```
//!
//! This calculator is independent of the live integration; sampling it at
//! the driving frequency must agree with the time-integrated oscillator's
//! amplitude once transients die out, which is the cross-check between the
//! two computations (exercised in `tests/engine.rs`).

use crate::error::ParameterError;
use crate::resonance::OscillatorParams;

/// One row of the resonance-curve sample table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Angular frequency (rad/s)
    pub omega: f64,
    /// Steady-state displacement amplitude
    pub amplitude: f64,
    /// Phase lag of the response behind the drive (rad, in [0, π])
    pub phase: f64,
}

/// Steady-state amplitude/phase calculator for one oscillator.
#[derive(Debug, Clone, Copy)]
pub struct ResonanceCurve {
    mass: f64,
    damping: f64,
    spring: f64,
    amplitude: f64,
}

impl ResonanceCurve {
    /// Build a curve for the given physical parameters and drive amplitude.
    pub fn new(mass: f64, damping: f64, spring: f64, amplitude: f64) -> Result<Self, ParameterError> {
        let params = OscillatorParams {
            mass,
            spring,
            damping,
            initial_position: 0.0,
            initial_velocity: 0.0,
        };
        params.validate()?;
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ParameterError::NonFinite {
                name: "driving amplitude",
                value: amplitude,
            });
        }
        Ok(Self {
            mass,
            damping,
            spring,
            amplitude,
        })
    }

    /// Curve for an oscillator already validated by the resonance model.
    pub fn from_params(params: &OscillatorParams, amplitude: f64) -> Result<Self, ParameterError> {
        Self::new(params.mass, params.damping, params.spring, amplitude)
    }

    /// Steady-state displacement amplitude at drive frequency `omega`.
    pub fn amplitude(&self, omega: f64) -> f64 {
        let elastic = self.spring - self.mass * omega * omega;
        let viscous = self.damping * omega;
        self.amplitude / (elastic * elastic + viscous * viscous).sqrt()
    }

    /// Phase lag of the response behind the drive at frequency `omega`.
    ///
    /// Sign convention matches the EOM above: 0 well below resonance, π/2
    /// at `sqrt(k/m)`, approaching π far above.
    pub fn phase(&self, omega: f64) -> f64 {
        let elastic = self.spring - self.mass * omega * omega;
        let viscous = self.damping * omega;
        viscous.atan2(elastic)
    }

    /// Frequency of the amplitude peak.
    ///
    /// `ω_res = sqrt(k/m − c²/(2m²))` for underdamped systems; for heavy
    /// damping (`c² ≥ 2km`) the response is monotonically decreasing and
    /// the peak sits at ω = 0.
    pub fn peak_frequency(&self) -> f64 {
        let arg = self.spring / self.mass
            - self.damping * self.damping / (2.0 * self.mass * self.mass);
        if arg > 0.0 { arg.sqrt() } else { 0.0 }
    }

    /// Uniformly sample the curve over `[omega_lo, omega_hi]`.
    ///
    /// Returns `count` rows including both endpoints (`count >= 2`).
    pub fn samples(&self, omega_lo: f64, omega_hi: f64, count: usize) -> Vec<CurveSample> {
        debug_assert!(count >= 2);
        debug_assert!(omega_hi >= omega_lo);
        let n = count.max(2);
        let step = (omega_hi - omega_lo) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let omega = omega_lo + i as f64 * step;
                CurveSample {
                    omega,
                    amplitude: self.amplitude(omega),
                    phase: self.phase(omega),
                }
            })
            .collect()
    }
}
