//! Confusion-matrix calibration
//!
//! Drives a sampler over every computational basis state and tabulates the
//! observed-state frequencies into a row-stochastic matrix with
//! C[i][j] = P(measure j | prepared i). A matrix whose condition number
//! exceeds the configured ceiling is rejected outright: inverting it would
//! not fail, it would silently amplify shot noise into garbage.

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basis;
use crate::error::{MitigationError, Result};
use crate::linalg;
use crate::sampler::{Counts, Sampler};

// =============================================================================
// Constants
// =============================================================================

/// Default shots per prepared basis state
pub const DEFAULT_CALIBRATION_SHOTS: usize = 1024;

/// Default condition-number ceiling for accepting a confusion matrix
pub const DEFAULT_CONDITION_THRESHOLD: f64 = 10.0;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for confusion-matrix calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Shots per prepared basis state
    pub shots: usize,
    /// Condition-number ceiling; calibration fails above it
    pub condition_threshold: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_CALIBRATION_SHOTS,
            condition_threshold: DEFAULT_CONDITION_THRESHOLD,
        }
    }
}

impl CalibrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_condition_threshold(mut self, threshold: f64) -> Self {
        self.condition_threshold = threshold;
        self
    }
}

// =============================================================================
// Confusion matrix
// =============================================================================

/// Row-stochastic empirical readout channel matrix
///
/// Built once per noise characterization and read-only afterward; share it
/// freely across threads.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    n_qubits: usize,
    matrix: Array2<f64>,
    condition_number: f64,
}

impl ConfusionMatrix {
    /// Calibrate by preparing each basis state in canonical order
    pub fn build<S: Sampler>(
        n_qubits: usize,
        sampler: &mut S,
        config: &CalibrationConfig,
    ) -> Result<Self> {
        validate_calibration_inputs(n_qubits, config)?;
        let dim = basis::dimension(n_qubits);
        let mut matrix = Array2::zeros((dim, dim));

        for (i, state) in basis::basis_states(n_qubits).iter().enumerate() {
            let counts = sampler.prepare_and_measure(state, config.shots)?;
            let row = tabulate_row(&counts, n_qubits, config.shots)?;
            matrix.row_mut(i).assign(&row);
            debug!("calibrated row {} of {} (prepared {})", i + 1, dim, state);
        }

        Self::from_rows(matrix, config.condition_threshold)
    }

    /// Row-parallel calibration
    ///
    /// Each worker clones the sampler and owns its row exclusively; rows are
    /// merged only after all of them complete. Note that cloning a seeded
    /// sampler replays the same random stream in every worker.
    pub fn build_parallel<S>(
        n_qubits: usize,
        sampler: &S,
        config: &CalibrationConfig,
    ) -> Result<Self>
    where
        S: Sampler + Clone + Send + Sync,
    {
        validate_calibration_inputs(n_qubits, config)?;
        let dim = basis::dimension(n_qubits);
        let states = basis::basis_states(n_qubits);

        let rows: Vec<Array1<f64>> = states
            .par_iter()
            .map(|state| {
                let mut local = sampler.clone();
                let counts = local.prepare_and_measure(state, config.shots)?;
                tabulate_row(&counts, n_qubits, config.shots)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut matrix = Array2::zeros((dim, dim));
        for (i, row) in rows.iter().enumerate() {
            matrix.row_mut(i).assign(row);
        }

        Self::from_rows(matrix, config.condition_threshold)
    }

    /// Validate and wrap an already-tabulated matrix
    pub fn from_rows(matrix: Array2<f64>, condition_threshold: f64) -> Result<Self> {
        let dim = matrix.nrows();
        if matrix.ncols() != dim || dim < 2 || !dim.is_power_of_two() {
            return Err(MitigationError::Precondition(format!(
                "confusion matrix must be square with power-of-two dimension, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        let n_qubits = dim.trailing_zeros() as usize;

        let condition_number = linalg::condition_number(&matrix);
        debug!(
            "confusion matrix tabulated: {} qubits, condition number {:.4}",
            n_qubits, condition_number
        );
        if condition_number > condition_threshold {
            return Err(MitigationError::IllConditioned {
                condition_number,
                threshold: condition_threshold,
            });
        }

        Ok(Self {
            n_qubits,
            matrix,
            condition_number,
        })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn condition_number(&self) -> f64 {
        self.condition_number
    }

    /// Row sums; each should be 1 within shot noise
    pub fn row_sums(&self) -> Array1<f64> {
        self.matrix.sum_axis(Axis(1))
    }

    /// Human-readable dump of the matrix and its condition number
    pub fn summary(&self) -> String {
        let mut s = format!(
            "ConfusionMatrix: {} qubits, condition number {:.4}\n",
            self.n_qubits, self.condition_number
        );
        for (i, row) in self.matrix.rows().into_iter().enumerate() {
            s.push_str(&format!("  |{}> ->", basis::state_label(i, self.n_qubits)));
            for v in row.iter() {
                s.push_str(&format!(" {:.6}", v));
            }
            s.push('\n');
        }
        s
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn tabulate_row(counts: &Counts, n_qubits: usize, shots: usize) -> Result<Array1<f64>> {
    let dim = basis::dimension(n_qubits);
    let mut row = Array1::zeros(dim);
    for (state, &count) in counts {
        let j = basis::state_index(state, n_qubits)?;
        row[j] += count as f64;
    }
    row /= shots as f64;
    Ok(row)
}

fn validate_calibration_inputs(n_qubits: usize, config: &CalibrationConfig) -> Result<()> {
    if n_qubits == 0 {
        return Err(MitigationError::Precondition(
            "at least one qubit is required".to_string(),
        ));
    }
    if config.shots == 0 {
        return Err(MitigationError::Precondition(
            "calibration shots must be at least 1".to_string(),
        ));
    }
    Ok(())
}
