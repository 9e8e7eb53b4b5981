//! Error types for the mitigation pipeline
//!
//! Calibration and correction are fail-fast: a bad confusion matrix or a
//! non-convergent projection would silently corrupt every downstream
//! statistic, so nothing here is caught or retried inside the crate.

use thiserror::Error;

/// Result type alias for mitigation operations
pub type Result<T> = std::result::Result<T, MitigationError>;

/// Errors raised by calibration, inversion, and correction
#[derive(Error, Debug)]
pub enum MitigationError {
    /// Confusion matrix too ill-conditioned to invert reliably
    #[error(
        "confusion matrix is ill-conditioned: condition number {condition_number:.4} exceeds threshold {threshold}"
    )]
    IllConditioned {
        condition_number: f64,
        threshold: f64,
    },

    /// Matrix inversion impossible
    #[error("confusion matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// Projection onto the probability simplex did not converge
    ///
    /// Carries the last iterate so callers can inspect how far off it was.
    #[error("projection failed to converge after {iterations} iterations (residual {residual:.3e})")]
    OptimizationFailed {
        iterations: usize,
        residual: f64,
        last_iterate: Vec<f64>,
    },

    /// Two distributions compared over different state sets
    #[error("state '{state}' is present in only one distribution")]
    KeyMismatch { state: String },

    /// Degenerate input
    #[error("precondition violated: {0}")]
    Precondition(String),
}
