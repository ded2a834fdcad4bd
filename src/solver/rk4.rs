//! Fixed-step classic 4th-order Runge-Kutta.

use super::{OdeModel, StepOutcome};

/// Classic RK4: four derivative evaluations per step (start, two midpoint
/// estimates, end) combined with weights 1/6, 1/3, 1/3, 1/6.
///
/// No error estimate; accuracy is governed solely by the caller-chosen `dt`.
/// Local truncation error is O(dt⁵), global error O(dt⁴). Negative `dt`
/// steps backward through the same formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4;

impl Rk4 {
    /// Advance `y` from `t` by exactly `dt`.
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

        let half = 0.5 * dt;
        let mut tmp = [0.0; N];

        let mut k1 = [0.0; N];
        model.deriv(t, y, &mut k1);

        for i in 0..N {
            tmp[i] = y[i] + half * k1[i];
        }
        let mut k2 = [0.0; N];
        model.deriv(t + half, &tmp, &mut k2);

        for i in 0..N {
            tmp[i] = y[i] + half * k2[i];
        }
        let mut k3 = [0.0; N];
        model.deriv(t + half, &tmp, &mut k3);

        for i in 0..N {
            tmp[i] = y[i] + dt * k3[i];
        }
        let mut k4 = [0.0; N];
        model.deriv(t + dt, &tmp, &mut k4);

        let mut y_new = [0.0; N];
        for i in 0..N {
            y_new[i] = y[i] + dt * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0;
        }

        StepOutcome::unchanged(y_new, t + dt)
    }
}
