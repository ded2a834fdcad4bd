//! Embedded adaptive Runge-Kutta 4(5).

use super::coefficients::{A, B5, B_ERR, C, STAGES};
use super::{Accuracy, AdaptiveConfig, OdeModel, StepOutcome};

/// Growth/shrink clamp on the step-size factor per attempt.
const MAX_FACTOR: f64 = 5.0;
const MIN_FACTOR: f64 = 0.2;

/// Fehlberg 4(5) embedded pair.
///
/// Six derivative evaluations per sub-step produce a 5th-order solution
/// (used to advance) and a 4th-order solution; the componentwise difference,
/// reduced to a max-abs scalar, is the local error estimate. The next step
/// size follows the I-controller `h_new = h * safety * (tol/err)^(1/5)`,
/// clamped to the configured bounds and to the remaining interval. A
/// sub-step is accepted only when `err <= tolerance`; rejected sub-steps
/// retry with the reduced size without advancing time. The minimum step and
/// the attempt cap both accept best-effort as [`Accuracy::Degraded`].
///
/// The step size warms up within a single call only; it is re-seeded from
/// `dt` every call, so identical inputs always produce identical outputs.
#[derive(Debug, Clone, Copy)]
pub struct Rk45 {
    cfg: AdaptiveConfig,
}

impl Rk45 {
    /// Create a solver with the given adaptive configuration.
    pub fn new(cfg: AdaptiveConfig) -> Self {
        Self { cfg }
    }

    /// Advance `y` from `t` by exactly `dt`, subdividing internally.
    pub fn step<const N: usize, M: OdeModel<N>>(
        &self,
        model: &M,
        t: f64,
        y: &[f64; N],
        dt: f64,
    ) -> StepOutcome<N> {
        if dt == 0.0 {
            return StepOutcome::unchanged(*y, t);
        }

        let span = dt.abs();
        let dir = dt.signum();
        let mut h = span.min(self.cfg.max_step);

        let mut y_cur = *y;
        let mut t_cur = t;
        let mut remaining = span;
        let mut attempts = 0u32;
        let mut degraded = false;
        let mut last_err = 0.0;
        let mut k = [[0.0; N]; STAGES];

        while remaining > 0.0 {
            let h_try = if attempts >= self.cfg.max_attempts {
                remaining
            } else {
                h.min(remaining)
            };
            attempts += 1;

            let hs = dir * h_try;
            let (y_new, err) = Self::stages(model, t_cur, &y_cur, hs, &mut k);

            let at_floor = h_try <= self.cfg.min_step;
            let out_of_budget = attempts >= self.cfg.max_attempts;
            let accepted = err <= self.cfg.tolerance || at_floor || out_of_budget;

            // I-controller: exponent 1/(p+1) with p = 4 for the error order
            let factor = if err == 0.0 {
                MAX_FACTOR
            } else {
                (self.cfg.safety * (self.cfg.tolerance / err).powf(0.2))
                    .clamp(MIN_FACTOR, MAX_FACTOR)
            };
            h = (h_try * factor).clamp(self.cfg.min_step, self.cfg.max_step);

            if accepted {
                if err > self.cfg.tolerance {
                    degraded = true;
                }
                y_cur = y_new;
                t_cur += hs;
                remaining -= h_try;
                last_err = err;
            }
        }

        StepOutcome {
            y: y_cur,
            t: t + dt,
            error: Some(last_err),
            accuracy: if degraded {
                Accuracy::Degraded
            } else {
                Accuracy::Full
            },
        }
    }

    /// Evaluate the six stages; return the 5th-order state and the max-abs
    /// difference between the embedded pair.
    fn stages<const N: usize, M: OdeModel<N>>(
        model: &M,
        t: f64,
        y: &[f64; N],
        hs: f64,
        k: &mut [[f64; N]; STAGES],
    ) -> ([f64; N], f64) {
        let mut tmp = [0.0; N];

        model.deriv(t, y, &mut k[0]);
        for i in 1..STAGES {
            for n in 0..N {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += A[i][j] * k[j][n];
                }
                tmp[n] = y[n] + hs * sum;
            }
            model.deriv(t + C[i] * hs, &tmp, &mut k[i]);
        }

        let mut y_new = [0.0; N];
        let mut err: f64 = 0.0;
        for n in 0..N {
            let mut acc = 0.0;
            let mut diff = 0.0;
            for i in 0..STAGES {
                acc += B5[i] * k[i][n];
                diff += B_ERR[i] * k[i][n];
            }
            y_new[n] = y[n] + hs * acc;
            err = err.max((hs * diff).abs());
        }

        (y_new, err)
    }
}
