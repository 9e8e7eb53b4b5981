//! Probability distribution utilities
//!
//! Pure numeric helpers shared by the mitigation pipeline and the experiment
//! driver: canonical-order vector extraction, Euclidean distance between
//! labeled distributions, and bitstring sampling.

use std::collections::HashMap;

use ndarray::Array1;
use rand::rngs::StdRng;

use crate::basis;
use crate::error::{MitigationError, Result};
use crate::sampler;

/// Extract the canonical-order probability vector from a labeled distribution
///
/// The map must be keyed by exactly the 2^n canonical basis states.
pub fn to_probability_vector(
    probabilities: &HashMap<String, f64>,
    n_qubits: usize,
) -> Result<Array1<f64>> {
    let dim = basis::dimension(n_qubits);
    if probabilities.len() != dim {
        return Err(MitigationError::Precondition(format!(
            "distribution has {} entries, expected {}",
            probabilities.len(),
            dim
        )));
    }
    let mut vector = Array1::zeros(dim);
    for (state, &p) in probabilities {
        let index = basis::state_index(state, n_qubits)?;
        vector[index] = p;
    }
    Ok(vector)
}

/// Euclidean distance between two distributions over the same state set
///
/// The key sets must match exactly; a missing key is a canonical-ordering
/// bug upstream, not something to paper over with a zero default.
pub fn distance(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> Result<f64> {
    for state in a.keys() {
        if !b.contains_key(state) {
            return Err(MitigationError::KeyMismatch {
                state: state.clone(),
            });
        }
    }
    for state in b.keys() {
        if !a.contains_key(state) {
            return Err(MitigationError::KeyMismatch {
                state: state.clone(),
            });
        }
    }
    let sum_sq: f64 = a
        .iter()
        .map(|(state, &pa)| {
            let pb = b[state];
            (pa - pb) * (pa - pb)
        })
        .sum();
    Ok(sum_sq.sqrt())
}

/// Sample bitstrings from a probability vector
///
/// The vector length must be a power of two. Each sample comes back as a
/// vector of bits, most significant first.
pub fn sample_probability_vector(
    probs: &[f64],
    samples: usize,
    rng: &mut StdRng,
) -> Result<Vec<Vec<u8>>> {
    let dim = probs.len();
    if dim == 0 || !dim.is_power_of_two() {
        return Err(MitigationError::Precondition(format!(
            "probability vector length {} is not a power of two",
            dim
        )));
    }
    let n_bits = dim.trailing_zeros() as usize;

    let mut bitstrings = Vec::with_capacity(samples);
    for _ in 0..samples {
        let outcome = sampler::sample_once(probs, rng);
        let bits: Vec<u8> = (0..n_bits)
            .rev()
            .map(|b| ((outcome >> b) & 1) as u8)
            .collect();
        bitstrings.push(bits);
    }
    Ok(bitstrings)
}
