//! Brent's method for one-dimensional root finding.
//!
//! The modal calculator needs the positive zeros of the cylindrical
//! eigenfunctions `J_m` to build circular plate modes. Zeros are first
//! bracketed by a coarse scan and then refined here. Brent's method combines
//! bisection, the secant method, and inverse quadratic interpolation, so it
//! converges superlinearly while never leaving the bracket.
//!
//! Reference: Brent, R.P. (1973). "Algorithms for Minimization without
//! Derivatives". Prentice-Hall.

/// Root refiner over a sign-changing bracket.
#[derive(Debug, Clone)]
pub struct Brent {
    /// Convergence tolerance on the bracket width
    pub tol: f64,
    /// Iteration cap
    pub max_iter: usize,
}

impl Default for Brent {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            max_iter: 60,
        }
    }
}

impl Brent {
    /// Create a refiner with the given tolerance and iteration cap.
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Find the root of `f` inside `[a, b]`.
    ///
    /// `f(a)` and `f(b)` must have opposite signs.
    pub fn find_root<F>(&self, mut f: F, mut a: f64, mut b: f64) -> Result<f64, RootError>
    where
        F: FnMut(f64) -> f64,
    {
        let mut fa = f(a);
        let mut fb = f(b);

        if fa * fb > 0.0 {
            return Err(RootError::NotBracketed { a, b, fa, fb });
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut bisected = true;
        let mut d = b - a;

        for _ in 0..self.max_iter {
            // Keep b as the best estimate
            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }

            if fb == 0.0 || (b - a).abs() <= self.tol {
                return Ok(b);
            }

            // Inverse quadratic interpolation when the three points are
            // distinct, secant otherwise
            let s = if fa != fc && fb != fc && fa != fb {
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else if fb != fa {
                b - fb * (b - a) / (fb - fa)
            } else {
                (a + b) / 2.0
            };

            let mid = (a + b) / 2.0;
            let fall_back = (s - (3.0 * a + b) / 4.0) * (s - b) > 0.0
                || (bisected && (s - b).abs() >= (b - c).abs() / 2.0)
                || (!bisected && (s - b).abs() >= (c - d).abs() / 2.0)
                || (bisected && (b - c).abs() < self.tol)
                || (!bisected && (c - d).abs() < self.tol);

            let s = if fall_back {
                bisected = true;
                mid
            } else {
                bisected = false;
                s
            };

            let fs = f(s);
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }
        }

        Err(RootError::MaxIterations {
            best: b,
            residual: fb,
        })
    }
}

/// Failure modes of [`Brent::find_root`].
#[derive(Debug, Clone)]
pub enum RootError {
    /// `f` has the same sign at both bracket endpoints
    NotBracketed {
        /// Left endpoint
        a: f64,
        /// Right endpoint
        b: f64,
        /// `f(a)`
        fa: f64,
        /// `f(b)`
        fb: f64,
    },
    /// Iteration cap hit before the bracket shrank below tolerance
    MaxIterations {
        /// Best estimate reached
        best: f64,
        /// `f` at the best estimate
        residual: f64,
    },
}

impl std::fmt::Display for RootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootError::NotBracketed { a, b, fa, fb } => {
                write!(
                    f,
                    "root not bracketed: f({}) = {}, f({}) = {} (same sign)",
                    a, fa, b, fb
                )
            }
            RootError::MaxIterations { best, residual } => {
                write!(
                    f,
                    "root refinement hit iteration cap, best {} (residual {})",
                    best, residual
                )
            }
        }
    }
}

impl std::error::Error for RootError {}
