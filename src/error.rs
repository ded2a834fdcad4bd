//! Construction-time parameter validation errors.
//!
//! Every fallible constructor in the crate validates its inputs up front and
//! returns one of these variants. Only invalid parameters block construction;
//! runtime anomalies (degraded accuracy, numerical instability) are surfaced
//! through flags instead, never through `Err`.

/// Rejected configuration or physical parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Oscillator mass must be strictly positive
    NonPositiveMass {
        /// The rejected value
        value: f64,
    },
    /// Spring constant must be strictly positive
    NonPositiveSpring {
        /// The rejected value
        value: f64,
    },
    /// Damping coefficient must be non-negative
    NegativeDamping {
        /// The rejected value
        value: f64,
    },
    /// A parameter that must be finite was NaN or infinite
    NonFinite {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },
    /// Plate dimension (width, height, radius, ...) must be strictly positive
    NonPositiveDimension {
        /// Name of the offending dimension
        name: &'static str,
        /// The rejected value
        value: f64,
    },
    /// Mode indices outside the supported range for the chosen shape
    UnsupportedMode {
        /// Requested first mode index
        m: u32,
        /// Requested second mode index
        n: u32,
        /// Why the pair was rejected
        reason: &'static str,
    },
    /// A resonance model needs at least one oscillator (index 0 is the reference)
    EmptyOscillatorBank,
    /// A particle population must contain at least one particle
    ZeroParticleCount,
    /// Solver configuration rejected (tolerance, step bounds, sub-step count)
    BadSolverConfig {
        /// Why the configuration was rejected
        reason: &'static str,
    },
    /// Nodal sampling grid too coarse to resolve sign changes
    GridTooCoarse {
        /// The rejected resolution
        resolution: usize,
    },
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::NonPositiveMass { value } => {
                write!(f, "mass must be positive, got {}", value)
            }
            ParameterError::NonPositiveSpring { value } => {
                write!(f, "spring constant must be positive, got {}", value)
            }
            ParameterError::NegativeDamping { value } => {
                write!(f, "damping coefficient must be non-negative, got {}", value)
            }
            ParameterError::NonFinite { name, value } => {
                write!(f, "{} must be finite, got {}", name, value)
            }
            ParameterError::NonPositiveDimension { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
            ParameterError::UnsupportedMode { m, n, reason } => {
                write!(f, "mode ({}, {}) unsupported: {}", m, n, reason)
            }
            ParameterError::EmptyOscillatorBank => {
                write!(f, "resonance model requires at least one oscillator")
            }
            ParameterError::ZeroParticleCount => {
                write!(f, "particle population must be non-empty")
            }
            ParameterError::BadSolverConfig { reason } => {
                write!(f, "invalid solver configuration: {}", reason)
            }
            ParameterError::GridTooCoarse { resolution } => {
                write!(f, "grid resolution {} too coarse for nodal sampling", resolution)
            }
        }
    }
}

impl std::error::Error for ParameterError {}
