//! Validation error types

use thiserror::Error;

/// Errors raised when a probability structure fails validation.
///
/// A failed validation never mutates a model: the caller keeps whatever
/// state it had before the attempted (re)set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Wrong dimensionality
    #[error("Shape error: expected {expected}, found {found}")]
    Shape {
        /// Expected shape, e.g. "2x2"
        expected: &'static str,
        /// Shape actually supplied
        found: String,
    },

    /// Entry outside [0, 1]
    #[error("Range error: entry {index} = {value} is outside [0, 1]")]
    Range {
        /// Position of the offending entry, e.g. "[1, 0]"
        index: String,
        /// Offending value
        value: f64,
    },

    /// Column or vector does not sum to 1 within tolerance
    #[error("Stochasticity error: {what} sums to {sum}, expected 1 (tolerance {tolerance})")]
    Stochasticity {
        /// Which column or vector failed
        what: String,
        /// Actual sum
        sum: f64,
        /// Tolerance used
        tolerance: f64,
    },
}

/// Result alias for validation
pub type Result<T> = std::result::Result<T, ValidationError>;
