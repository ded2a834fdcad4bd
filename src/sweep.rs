//! Driving-frequency schedule.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Angular driving frequency ω(t) supplied to the resonance model.
///
/// The control layer either pins the frequency or sweeps it linearly while
/// the user drags a slider or runs a frequency scan. The model evaluates
/// this at its current time each step, so a sweep never requires mutating
/// the model mid-tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sweep {
    /// Fixed angular frequency (rad/s)
    Constant(f64),
    /// Linear ramp `ω(t) = start + rate·t`, floored at zero
    Linear {
        /// Angular frequency at t = 0 (rad/s)
        start: f64,
        /// Ramp rate (rad/s per second), may be negative
        rate: f64,
    },
}

impl Default for Sweep {
    fn default() -> Self {
        Sweep::Constant(1.0)
    }
}

impl Sweep {
    /// Angular frequency at time `t`.
    pub fn omega(&self, t: f64) -> f64 {
        match *self {
            Sweep::Constant(omega) => omega,
            Sweep::Linear { start, rate } => (start + rate * t).max(0.0),
        }
    }

    /// Validate finiteness and non-negativity of the schedule.
    pub fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            Sweep::Constant(omega) => {
                if !omega.is_finite() {
                    return Err(ParameterError::NonFinite {
                        name: "driving frequency",
                        value: omega,
                    });
                }
                if omega < 0.0 {
                    return Err(ParameterError::NonPositiveDimension {
                        name: "driving frequency",
                        value: omega,
                    });
                }
            }
            Sweep::Linear { start, rate } => {
                if !start.is_finite() {
                    return Err(ParameterError::NonFinite {
                        name: "sweep start frequency",
                        value: start,
                    });
                }
                if start < 0.0 {
                    return Err(ParameterError::NonPositiveDimension {
                        name: "sweep start frequency",
                        value: start,
                    });
                }
                if !rate.is_finite() {
                    return Err(ParameterError::NonFinite {
                        name: "sweep rate",
                        value: rate,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_time() {
        let sweep = Sweep::Constant(3.5);
        assert_eq!(sweep.omega(0.0), 3.5);
        assert_eq!(sweep.omega(100.0), 3.5);
    }

    #[test]
    fn linear_ramp_floors_at_zero() {
        let sweep = Sweep::Linear {
            start: 2.0,
            rate: -1.0,
        };
        assert_eq!(sweep.omega(0.0), 2.0);
        assert_eq!(sweep.omega(1.0), 1.0);
        assert_eq!(sweep.omega(5.0), 0.0);
    }

    #[test]
    fn rejects_nan_frequency() {
        assert!(Sweep::Constant(f64::NAN).validate().is_err());
        assert!(Sweep::Constant(-1.0).validate().is_err());
        assert!(Sweep::Constant(0.0).validate().is_ok());
    }
}
