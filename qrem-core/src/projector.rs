//! Projection onto the probability simplex
//!
//! Mitigated quasi-probabilities may carry negative entries or sum away
//! from 1. This module solves the constrained least-squares problem
//!
//! ```text
//! minimize   ||x - q||_2
//! subject to 0 <= x_i <= 1,  sum x_i = 1
//! ```
//!
//! returning the valid distribution closest to the quasi-probability input.
//! The optimum of this convex program has the form
//! `x_i = clamp(q_i - shift, 0, 1)` for a scalar shift fixed by the
//! normalization constraint; the shift is located by bisection, which
//! converges to the exact constrained optimum.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{MitigationError, Result};

// =============================================================================
// Constants
// =============================================================================

/// Default residual tolerance on the normalization constraint
pub const DEFAULT_PROJECTION_TOLERANCE: f64 = 1e-12;

/// Default iteration cap for the bisection
pub const DEFAULT_MAX_PROJECTION_ITERATIONS: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the simplex projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Allowed deviation of the output sum from 1
    pub tolerance: f64,
    /// Bisection iteration cap
    pub max_iterations: usize,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_PROJECTION_TOLERANCE,
            max_iterations: DEFAULT_MAX_PROJECTION_ITERATIONS,
        }
    }
}

impl ProjectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

// =============================================================================
// Projection
// =============================================================================

/// Closest valid probability distribution to a quasi-probability vector
///
/// Fails with `Precondition` when the input has no positive mass at all
/// (nothing meaningful to project) and with `OptimizationFailed` when the
/// bisection does not meet the residual tolerance within the iteration cap.
pub fn closest_positive_distribution(
    quasi: ArrayView1<f64>,
    config: &ProjectorConfig,
) -> Result<Array1<f64>> {
    if quasi.is_empty() {
        return Err(MitigationError::Precondition(
            "quasi-probability vector is empty".to_string(),
        ));
    }
    let positive_mass: f64 = quasi.iter().map(|&q| q.max(0.0)).sum();
    if positive_mass <= 0.0 {
        return Err(MitigationError::Precondition(
            "quasi-probability vector has no positive mass to project".to_string(),
        ));
    }

    // shifted_mass is continuous and non-increasing in the shift;
    // mass(lo) >= 1 and mass(hi) = 0 bracket the root.
    let mut lo = quasi.iter().cloned().fold(f64::INFINITY, f64::min) - 1.0;
    let mut hi = quasi.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let mut shift = lo;
    let mut residual = f64::INFINITY;
    for _ in 0..config.max_iterations {
        shift = 0.5 * (lo + hi);
        let mass = shifted_mass(quasi, shift);
        residual = (mass - 1.0).abs();
        if residual <= config.tolerance {
            return Ok(project_with_shift(quasi, shift));
        }
        if mass > 1.0 {
            lo = shift;
        } else {
            hi = shift;
        }
    }

    Err(MitigationError::OptimizationFailed {
        iterations: config.max_iterations,
        residual,
        last_iterate: project_with_shift(quasi, shift).to_vec(),
    })
}

fn shifted_mass(quasi: ArrayView1<f64>, shift: f64) -> f64 {
    quasi.iter().map(|&q| (q - shift).clamp(0.0, 1.0)).sum()
}

fn project_with_shift(quasi: ArrayView1<f64>, shift: f64) -> Array1<f64> {
    quasi.mapv(|q| (q - shift).clamp(0.0, 1.0))
}
