//! Mitigation applicator
//!
//! Turns raw counts into a labeled probability mapping over the full
//! canonical state set, optionally corrects it through a [`Mitigator`], and
//! projects the corrected result back onto valid distributions. The output
//! always contains exactly the 2^n canonical keys.

use std::collections::HashMap;

use crate::basis;
use crate::distribution;
use crate::error::{MitigationError, Result};
use crate::mitigator::Mitigator;
use crate::projector::{self, ProjectorConfig};
use crate::sampler::Counts;

/// Raw empirical probabilities over every canonical basis state
///
/// States absent from `counts` get probability 0.0.
pub fn empirical_probabilities(
    counts: &Counts,
    n_qubits: usize,
    shots: usize,
) -> Result<HashMap<String, f64>> {
    if n_qubits == 0 {
        return Err(MitigationError::Precondition(
            "at least one qubit is required".to_string(),
        ));
    }
    if shots == 0 {
        return Err(MitigationError::Precondition(
            "shots must be at least 1".to_string(),
        ));
    }

    let mut probabilities: HashMap<String, f64> = basis::basis_states(n_qubits)
        .into_iter()
        .map(|state| (state, 0.0))
        .collect();
    for (state, &count) in counts {
        // Reject labels outside the canonical state set early
        basis::state_index(state, n_qubits)?;
        probabilities.insert(state.clone(), count as f64 / shots as f64);
    }
    Ok(probabilities)
}

/// Apply measurement error mitigation to raw counts
///
/// Without a mitigator the raw normalized mapping is returned unchanged.
/// With one, the observed distribution is reordered into canonical vector
/// form, corrected, projected, and reordered back into the labeled mapping.
pub fn apply_mitigation(
    counts: &Counts,
    n_qubits: usize,
    shots: usize,
    mitigator: Option<&Mitigator>,
) -> Result<HashMap<String, f64>> {
    apply_mitigation_with(counts, n_qubits, shots, mitigator, &ProjectorConfig::default())
}

/// As [`apply_mitigation`], with explicit projector settings
pub fn apply_mitigation_with(
    counts: &Counts,
    n_qubits: usize,
    shots: usize,
    mitigator: Option<&Mitigator>,
    projector_config: &ProjectorConfig,
) -> Result<HashMap<String, f64>> {
    let mut probabilities = empirical_probabilities(counts, n_qubits, shots)?;

    let mitigator = match mitigator {
        Some(m) => m,
        None => return Ok(probabilities),
    };
    if mitigator.n_qubits() != n_qubits {
        return Err(MitigationError::Precondition(format!(
            "mitigator was calibrated for {} qubits, counts use {}",
            mitigator.n_qubits(),
            n_qubits
        )));
    }

    let observed = distribution::to_probability_vector(&probabilities, n_qubits)?;
    let quasi = mitigator.apply(observed.view());
    let corrected = projector::closest_positive_distribution(quasi.view(), projector_config)?;

    for (index, &p) in corrected.iter().enumerate() {
        probabilities.insert(basis::state_label(index, n_qubits), p);
    }
    Ok(probabilities)
}
