//! Pluggable ODE integration framework.
//!
//! A [`Solver`] advances a first-order state vector `y' = f(t, y)` over an
//! externally supplied interval `dt`. The derivative comes from an
//! [`OdeModel`] implementation; solvers are strategies selected per
//! oscillator at model construction via [`SolverConfig`].
//!
//! Contract shared by every variant:
//!
//! - repeated calls with identical inputs are deterministic and
//!   side-effect-free with respect to the model;
//! - fixed-step variants consume exactly `dt` in one stride;
//! - adaptive variants may subdivide `dt` internally but always return
//!   having advanced exactly `dt` of simulated time, with internal attempts
//!   capped by [`AdaptiveConfig::max_attempts`] to bound per-call latency;
//! - negative `dt` performs a single-step rewind through the same code path
//!   (a documented approximation, not a bit-exact inverse).

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

pub mod adaptive_euler;
pub mod coefficients;
pub mod midpoint;
pub mod rk4;
pub mod rk45;

pub use adaptive_euler::AdaptiveEuler;
pub use midpoint::ModifiedMidpoint;
pub use rk4::Rk4;
pub use rk45::Rk45;

/// First-order ODE system: `dy/dt = f(t, y)`.
///
/// Implementations must be pure: the same `(t, y)` always yields the same
/// derivative, and `deriv` mutates nothing but `dydt`.
pub trait OdeModel<const N: usize> {
    /// Evaluate the right-hand side at `(t, y)`, writing into `dydt`.
    fn deriv(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// Whether a step met its accuracy target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// All internal sub-steps satisfied the configured tolerance
    Full,
    /// The retry cap or the minimum step size was hit; the returned state is
    /// best-effort (informational, never fatal)
    Degraded,
}

/// Result of advancing a state vector by one external interval.
#[derive(Debug, Clone)]
pub struct StepOutcome<const N: usize> {
    /// State after consuming the full interval
    pub y: [f64; N],
    /// Time after the step (always start time plus the requested `dt`)
    pub t: f64,
    /// Local error estimate of the last accepted sub-step, when the variant
    /// produces one (`None` for fixed-step solvers)
    pub error: Option<f64>,
    /// Whether the tolerance was met throughout
    pub accuracy: Accuracy,
}

impl<const N: usize> StepOutcome<N> {
    /// Outcome for a zero-length interval: state unchanged, full accuracy.
    pub(crate) fn unchanged(y: [f64; N], t: f64) -> Self {
        Self {
            y,
            t,
            error: None,
            accuracy: Accuracy::Full,
        }
    }
}

/// Tolerance and step-size bounds for the adaptive solver variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// Absolute local error tolerance per external interval
    pub tolerance: f64,
    /// Smallest internal sub-step; reaching it accepts the step as
    /// [`Accuracy::Degraded`] rather than failing
    pub min_step: f64,
    /// Largest internal sub-step (also caps step-size growth)
    pub max_step: f64,
    /// Safety factor applied to the predicted next step size
    pub safety: f64,
    /// Cap on internal attempts (accepted plus rejected) per external call
    pub max_attempts: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            min_step: 1e-9,
            max_step: 0.1,
            safety: 0.9,
            max_attempts: 50,
        }
    }
}

impl AdaptiveConfig {
    /// Validate tolerance and step bounds.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ParameterError::BadSolverConfig {
                reason: "tolerance must be positive and finite",
            });
        }
        if !self.min_step.is_finite() || self.min_step <= 0.0 {
            return Err(ParameterError::BadSolverConfig {
                reason: "min_step must be positive and finite",
            });
        }
        if !self.max_step.is_finite() || self.max_step < self.min_step {
            return Err(ParameterError::BadSolverConfig {
                reason: "max_step must be finite and at least min_step",
            });
        }
        if !self.safety.is_finite() || self.safety <= 0.0 || self.safety >= 1.0 {
            return Err(ParameterError::BadSolverConfig {
                reason: "safety factor must lie in (0, 1)",
            });
        }
        if self.max_attempts == 0 {
            return Err(ParameterError::BadSolverConfig {
                reason: "max_attempts must be at least 1",
            });
        }
        Ok(())
    }
}

/// Externally selectable solver variant with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolverConfig {
    /// Classic fixed-step 4th-order Runge-Kutta
    FixedRk4,
    /// Step-halving adaptive Euler
    AdaptiveEuler(AdaptiveConfig),
    /// Embedded Fehlberg 4(5) pair with I-controller step sizing
    AdaptiveRk45(AdaptiveConfig),
    /// Modified midpoint over `substeps` equal sub-intervals
    ModifiedMidpoint {
        /// Number of equal sub-steps (at least 1)
        substeps: usize,
    },
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig::FixedRk4
    }
}

/// A configured, ready-to-step solver instance.
///
/// Independent value types per variant, dispatched by match rather than a
/// trait object, so per-oscillator storage stays flat and copyable. No
/// variant carries mutable state, so stepping needs only `&self` and
/// identical inputs always produce identical outputs.
#[derive(Debug, Clone, Copy)]
pub enum Solver {
    /// Fixed-step RK4
    FixedRk4(Rk4),
    /// Step-halving Euler
    AdaptiveEuler(AdaptiveEuler),
    /// Embedded RK4(5)
    AdaptiveRk45(Rk45),
    /// Modified midpoint
    ModifiedMidpoint(ModifiedMidpoint),
}

impl Solver {
    /// Build a solver instance from its configuration.
    pub fn from_config(config: &SolverConfig) -> Result<Self, ParameterError> {
        match config {
            SolverConfig::FixedRk4 => Ok(Solver::FixedRk4(Rk4)),
            SolverConfig::AdaptiveEuler(cfg) => {
                cfg.validate()?;
                Ok(Solver::AdaptiveEuler(AdaptiveEuler::new(*cfg)))
            }
            SolverConfig::AdaptiveRk45(cfg) => {
                cfg.validate()?;
                Ok(Solver::AdaptiveRk45(Rk45::new(*cfg)))
            }
            SolverConfig::ModifiedMidpoint { substeps } => {
                if *substeps == 0 {
                    return Err(ParameterError::BadSolverConfig {
                        reason: "modified midpoint needs at least one sub-step",
                    });
                }
                Ok(Solver::ModifiedMidpoint(ModifiedMidpoint::new(*substeps)))
            }
        }
    }

    /// Advance `y` from `t` by exactly `dt`.
    pub fn step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t: f64,
        y: &[f64; N],
        dt: f64,
    ) -> StepOutcome<N> {
        match self {
            Solver::FixedRk4(s) => s.step(model, t, y, dt),
            Solver::AdaptiveEuler(s) => s.step(model, t, y, dt),
            Solver::AdaptiveRk45(s) => s.step(model, t, y, dt),
            Solver::ModifiedMidpoint(s) => s.step(model, t, y, dt),
        }
    }

    /// Human-readable variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Solver::FixedRk4(_) => "fixed-rk4",
            Solver::AdaptiveEuler(_) => "adaptive-euler",
            Solver::AdaptiveRk45(_) => "adaptive-rk45",
            Solver::ModifiedMidpoint(_) => "modified-midpoint",
        }
    }

    /// Order of accuracy of the advancing solution.
    pub fn order(&self) -> usize {
        match self {
            Solver::FixedRk4(_) => 4,
            Solver::AdaptiveEuler(_) => 1,
            Solver::AdaptiveRk45(_) => 5,
            Solver::ModifiedMidpoint(_) => 2,
        }
    }
}
