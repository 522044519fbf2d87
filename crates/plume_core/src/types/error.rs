//! Error types for structured error handling.
//!
//! This module provides:
//! - `InputError`: Errors from input validation before an inversion starts
//! - `SolverError`: Errors from the scalar gradient solver
//!
//! Numerical instability and non-convergence *during* an inversion are not
//! errors: they are recovered into a well-formed result with diagnostic
//! flags. Only conditions that make a run meaningless before it starts are
//! surfaced as `Err`.

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any optimisation work begins; invalid inputs are rejected,
/// never silently defaulted.
///
/// # Examples
/// ```
/// use plume_core::types::InputError;
///
/// let err = InputError::NegativeWindSpeed { speed: -1.5 };
/// assert_eq!(format!("{}", err), "negative wind speed: -1.5 m/s");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Wind speed below zero.
    #[error("negative wind speed: {speed} m/s")]
    NegativeWindSpeed {
        /// Rejected wind speed (m/s).
        speed: f64,
    },

    /// Wind speed or direction is NaN or infinite.
    #[error("non-finite wind value: {value}")]
    NonFiniteWind {
        /// Rejected value.
        value: f64,
    },

    /// No receptors supplied.
    #[error("empty receptor set")]
    EmptyReceptorSet,

    /// Receptor and observation vectors have different lengths.
    #[error("receptor/observation length mismatch (receptors: {receptors}, observations: {observations})")]
    LengthMismatch {
        /// Number of receptor points.
        receptors: usize,
        /// Number of observed concentrations.
        observations: usize,
    },

    /// Effective source height must be strictly positive.
    #[error("non-positive source height: {height} m")]
    NonPositiveSourceHeight {
        /// Rejected stack height (m).
        height: f64,
    },

    /// Observed concentration is NaN, infinite, or negative.
    #[error("invalid observation at index {index}: {value}")]
    InvalidObservation {
        /// Position in the observation vector.
        index: usize,
        /// Rejected concentration value.
        value: f64,
    },

    /// Receptor coordinate is NaN or infinite.
    #[error("non-finite receptor coordinate at index {index}")]
    InvalidReceptor {
        /// Position in the receptor vector.
        index: usize,
    },

    /// Unrecognised stability class letter.
    #[error("unknown stability class: {0:?}")]
    UnknownStabilityClass(String),

    /// Receptor field domain does not extend past its near edge.
    #[error("domain extent {domain_m} m must exceed {min_m} m")]
    DomainTooSmall {
        /// Rejected domain extent (m).
        domain_m: f64,
        /// Smallest acceptable extent (m).
        min_m: f64,
    },

    /// Noise fraction is NaN, infinite, or negative.
    #[error("invalid noise fraction: {value}")]
    InvalidNoiseFraction {
        /// Rejected noise fraction.
        value: f64,
    },

    /// Grid axes and value buffer do not describe a rectangular field.
    #[error("grid shape mismatch (x: {x_len}, y: {y_len}, values: {values_len})")]
    GridShapeMismatch {
        /// Length of the x axis.
        x_len: usize,
        /// Length of the y axis.
        y_len: usize,
        /// Length of the row-major value buffer.
        values_len: usize,
    },
}

/// Errors from the scalar gradient solver.
///
/// The solver recovers from transient NaN/Inf iterations internally; this
/// error is reserved for problems that prevent the solve from starting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Objective or gradient was non-finite at the initial parameter.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// Solver configuration is unusable (e.g. zero learning rate).
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::EmptyReceptorSet;
        assert_eq!(format!("{}", err), "empty receptor set");

        let err = InputError::LengthMismatch {
            receptors: 3,
            observations: 4,
        };
        assert!(format!("{}", err).contains("receptors: 3"));
    }

    #[test]
    fn test_input_error_eq() {
        let a = InputError::NonPositiveSourceHeight { height: 0.0 };
        let b = InputError::NonPositiveSourceHeight { height: 0.0 };
        assert_eq!(a, b);
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NumericalInstability("NaN loss at start".to_string());
        assert_eq!(
            format!("{}", err),
            "numerical instability: NaN loss at start"
        );
    }

    #[test]
    fn test_errors_are_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<InputError>();
        assert_error::<SolverError>();
    }
}
