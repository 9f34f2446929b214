//! Error hierarchy for trace, driving-function and Burgers computations.
//!
//! Numerical degradation (NaN/Inf, a point landing below the real axis) is
//! never converted into an error here. Only configuration mistakes and
//! violated preconditions are.

use thiserror::Error;

/// Root error type for all `multiple_sle` failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SleError {
    /// Unrecognized driving-function method name.
    #[error("no such method as {0:?} (expected \"BM\" or \"GBM\")")]
    UnknownMethod(String),

    /// A numeric parameter is out of range or a Möbius map is degenerate.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A time grid needs at least one point.
    #[error("time grid is empty")]
    EmptyTimeGrid,

    /// Time grid entries must be finite.
    #[error("time grid entry {index} is not finite")]
    NonFiniteTime { index: usize },

    /// Time grid entries must be strictly increasing.
    #[error("time grid is not strictly increasing at index {index}: {previous} then {current}")]
    NonIncreasingTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// A driving path does not cover the time grid exactly.
    #[error("driving path {slit} has {found} samples, time grid has {expected}")]
    LengthMismatch {
        slit: usize,
        expected: usize,
        found: usize,
    },

    /// Two coupled driving functions start at the same point.
    #[error("starting points {first} and {second} coincide at {value}")]
    CoincidentStartingPoints {
        first: usize,
        second: usize,
        value: f64,
    },

    /// Drift or diffusion returned the wrong shape for the integration state.
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The Milstein scheme only handles diagonal noise.
    #[error("Milstein scheme requires a square diagonal diffusion matrix")]
    NonDiagonalNoise,
}

pub type SleResult<T> = Result<T, SleError>;

/// Reject a parameter that is not a finite number.
pub(crate) fn ensure_finite(name: &str, value: f64) -> SleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SleError::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Reject a parameter that is negative or not finite.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> SleResult<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(SleError::InvalidParameter(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
