//! Fehlberg 4(5) coefficients.
//!
//! Butcher tableau for the 6-stage embedded RK4(5) pair from:
//! Fehlberg, E. (1969). "Low-order classical Runge-Kutta formulas with
//! stepsize control and their application to some heat transfer problems".
//! NASA TR R-315, Table III.
//!
//! The same six derivative evaluations produce a 5th-order solution (used to
//! advance the state) and a 4th-order solution whose difference is the local
//! error estimate.

/// Number of stages in the RKF4(5) method
pub const STAGES: usize = 6;

/// Order of the advancing solution
pub const ORDER: u8 = 5;

/// Order of the embedded error-estimating solution
pub const EMBEDDED_ORDER: u8 = 4;

/// Node coefficients (c_i): stage i evaluates f at t + c[i]*h
pub const C: [f64; STAGES] = [
    0.0,          // c[0]
    0.25,         // c[1] = 1/4
    0.375,        // c[2] = 3/8
    12.0 / 13.0,  // c[3]
    1.0,          // c[4]
    0.5,          // c[5] = 1/2
];

/// Runge-Kutta matrix (a_ij), lower triangular by rows
pub const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [0.25, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

/// Weights of the 5th-order solution
pub const B5: [f64; STAGES] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

/// Weights of the embedded 4th-order solution
pub const B4: [f64; STAGES] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -0.2,
    0.0,
];

/// Error weights: B5 - B4, so `h * Σ B_ERR[i] * k[i]` is the componentwise
/// difference between the two solutions
pub const B_ERR: [f64; STAGES] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];
