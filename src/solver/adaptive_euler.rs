//! Step-halving adaptive Euler.

use super::{Accuracy, AdaptiveConfig, OdeModel, StepOutcome};

/// Adaptive Euler with step-halving error control.
///
/// Each sub-step computes one full Euler step and two consecutive half
/// steps over the same sub-interval; their difference estimates the local
/// error. A sub-step failing its tolerance (scaled to the sub-interval
/// length) is halved and retried; one comfortably under tolerance doubles
/// the next attempt, bounded by the configured maximum. Reaching the minimum
/// step or the attempt cap accepts the state as [`Accuracy::Degraded`].
///
/// The accepted state is the two-half-step result, the more accurate of the
/// pair.
///
/// The step size warms up within a single call only; it is re-seeded from
/// `dt` every call, so identical inputs always produce identical outputs.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveEuler {
    cfg: AdaptiveConfig,
}

impl AdaptiveEuler {
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

        while remaining > 0.0 {
            // Out of attempt budget: consume the rest in one best-effort
            // stride so the call still advances exactly dt
            let h_try = if attempts >= self.cfg.max_attempts {
                remaining
            } else {
                h.min(remaining)
            };
            attempts += 1;

            let hs = dir * h_try;
            let half = 0.5 * hs;

            let mut d0 = [0.0; N];
            model.deriv(t_cur, &y_cur, &mut d0);

            // One full Euler step
            let mut y_full = [0.0; N];
            for i in 0..N {
                y_full[i] = y_cur[i] + hs * d0[i];
            }

            // Two consecutive half steps over the same interval
            let mut y_half = [0.0; N];
            for i in 0..N {
                y_half[i] = y_cur[i] + half * d0[i];
            }
            let mut d1 = [0.0; N];
            model.deriv(t_cur + half, &y_half, &mut d1);
            let mut y_two = [0.0; N];
            for i in 0..N {
                y_two[i] = y_half[i] + half * d1[i];
            }

            let mut err: f64 = 0.0;
            for i in 0..N {
                err = err.max((y_two[i] - y_full[i]).abs());
            }

            // Tolerance share proportional to the sub-interval length
            let tol = self.cfg.tolerance * (h_try / span);
            let at_floor = h_try <= self.cfg.min_step;
            let out_of_budget = attempts >= self.cfg.max_attempts;

            if err <= tol || at_floor || out_of_budget {
                if err > tol {
                    degraded = true;
                }
                y_cur = y_two;
                t_cur += hs;
                remaining -= h_try;
                last_err = err;

                if err <= 0.25 * tol {
                    h = (h_try * 2.0).min(self.cfg.max_step);
                } else {
                    h = h_try.max(self.cfg.min_step);
                }
            } else {
                h = (h_try * 0.5).max(self.cfg.min_step);
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
}
