//! Modified midpoint method.

use super::{OdeModel, StepOutcome};

/// Modified midpoint: `n` equal sub-steps of the 2nd-order midpoint scheme
/// across the requested interval, finished with the standard terminal
/// average `(z_n + z_{n-1} + h f(t_end, z_n)) / 2`.
///
/// Usable standalone, or as the building block for Richardson extrapolation
/// by callers that invoke it at several sub-step counts and extrapolate
/// (the extrapolation itself is outside this type's contract).
#[derive(Debug, Clone, Copy)]
pub struct ModifiedMidpoint {
    substeps: usize,
}

impl ModifiedMidpoint {
    /// Create a solver using `substeps` equal sub-intervals (at least 1).
    pub fn new(substeps: usize) -> Self {
        debug_assert!(substeps >= 1);
        Self { substeps }
    }

    /// Number of sub-intervals.
    pub fn substeps(&self) -> usize {
        self.substeps
    }

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

        let n = self.substeps;
        let h = dt / n as f64;

        let mut d = [0.0; N];
        model.deriv(t, y, &mut d);

        // First sub-step is plain Euler to seed the two-term recurrence
        let mut z_prev = *y;
        let mut z_cur = [0.0; N];
        for i in 0..N {
            z_cur[i] = y[i] + h * d[i];
        }

        // z_{m+1} = z_{m-1} + 2h f(t + m h, z_m)
        for m in 1..n {
            model.deriv(t + m as f64 * h, &z_cur, &mut d);
            let mut z_next = [0.0; N];
            for i in 0..N {
                z_next[i] = z_prev[i] + 2.0 * h * d[i];
            }
            z_prev = z_cur;
            z_cur = z_next;
        }

        model.deriv(t + dt, &z_cur, &mut d);
        let mut y_new = [0.0; N];
        for i in 0..N {
            y_new[i] = 0.5 * (z_cur[i] + z_prev[i] + h * d[i]);
        }

        StepOutcome::unchanged(y_new, t + dt)
    }
}
