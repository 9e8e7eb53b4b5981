//! Sampler abstraction over the measurement backend
//!
//! Calibration needs exactly one capability from the outside world: prepare
//! a computational basis state and report measured counts. Anything that can
//! do that plugs in through the [`Sampler`] trait, which keeps the pipeline
//! testable with a canned fake and independent of any simulation backend.

use std::collections::HashMap;

use rand::prelude::*;
use rand::SeedableRng;

use crate::basis;
use crate::error::{MitigationError, Result};
use crate::noise::ReadoutNoise;

/// Measured counts keyed by basis-state label, summing to the shot count
pub type Counts = HashMap<String, usize>;

/// Capability interface for preparing and measuring basis states
pub trait Sampler {
    /// Prepare `basis_state`, measure it `shots` times, return the counts
    fn prepare_and_measure(&mut self, basis_state: &str, shots: usize) -> Result<Counts>;
}

// =============================================================================
// Shot sampling
// =============================================================================

/// Draw `shots` samples from a probability vector and tabulate them
pub fn sample_counts(probs: &[f64], shots: usize, n_qubits: usize, rng: &mut StdRng) -> Counts {
    let mut counts = Counts::new();
    for _ in 0..shots {
        let outcome = sample_once(probs, rng);
        *counts
            .entry(basis::state_label(outcome, n_qubits))
            .or_insert(0) += 1;
    }
    counts
}

/// Single draw by cumulative scan
pub(crate) fn sample_once(probs: &[f64], rng: &mut StdRng) -> usize {
    let r: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    probs.len() - 1
}

// =============================================================================
// Noisy sampler
// =============================================================================

/// Sampler that prepares ideal basis states and reads them out through a
/// [`ReadoutNoise`] channel
#[derive(Debug, Clone)]
pub struct NoisySampler {
    noise: ReadoutNoise,
    rng: StdRng,
}

impl NoisySampler {
    pub fn new(noise: ReadoutNoise, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { noise, rng }
    }

    /// Noise-free sampler; counts deviate from the target only by shot noise
    pub fn ideal(seed: Option<u64>) -> Self {
        Self::new(ReadoutNoise::ideal(), seed)
    }

    pub fn noise(&self) -> &ReadoutNoise {
        &self.noise
    }
}

impl Sampler for NoisySampler {
    fn prepare_and_measure(&mut self, basis_state: &str, shots: usize) -> Result<Counts> {
        if shots == 0 {
            return Err(MitigationError::Precondition(
                "shots must be at least 1".to_string(),
            ));
        }
        let n_qubits = basis_state.len();
        let index = basis::state_index(basis_state, n_qubits)?;

        let mut probs = vec![0.0; basis::dimension(n_qubits)];
        probs[index] = 1.0;
        let noisy = self.noise.apply(&probs, n_qubits);

        Ok(sample_counts(&noisy, shots, n_qubits, &mut self.rng))
    }
}

// =============================================================================
// Fixed sampler
// =============================================================================

/// Deterministic sampler returning canned counts
///
/// Lets the calibration path be exercised without randomness or a backend.
#[derive(Debug, Clone, Default)]
pub struct FixedSampler {
    responses: HashMap<String, Counts>,
}

impl FixedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the counts returned when `basis_state` is prepared
    pub fn with_response(mut self, basis_state: &str, counts: Counts) -> Self {
        self.responses.insert(basis_state.to_string(), counts);
        self
    }
}

impl Sampler for FixedSampler {
    fn prepare_and_measure(&mut self, basis_state: &str, _shots: usize) -> Result<Counts> {
        self.responses.get(basis_state).cloned().ok_or_else(|| {
            MitigationError::Precondition(format!(
                "no canned response for state '{}'",
                basis_state
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_counts_total() {
        let mut rng = StdRng::seed_from_u64(42);
        let counts = sample_counts(&[0.5, 0.5], 1000, 1, &mut rng);
        let total: usize = counts.values().sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_sample_counts_balanced() {
        let mut rng = StdRng::seed_from_u64(42);
        let counts = sample_counts(&[0.5, 0.5], 1000, 1, &mut rng);
        let zeros = *counts.get("0").unwrap_or(&0);
        assert!(zeros > 400 && zeros < 600, "got {} zeros", zeros);
    }

    #[test]
    fn test_sample_counts_deterministic_with_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let ca = sample_counts(&[0.3, 0.7], 500, 1, &mut a);
        let cb = sample_counts(&[0.3, 0.7], 500, 1, &mut b);
        assert_eq!(ca, cb);
    }

    #[test]
    fn test_noisy_sampler_ideal_is_exact() {
        let mut sampler = NoisySampler::ideal(Some(42));
        let counts = sampler.prepare_and_measure("10", 100).unwrap();
        assert_eq!(counts.get("10"), Some(&100));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_noisy_sampler_flips_states() {
        let noise = ReadoutNoise::new(
            crate::noise::ReadoutNoiseConfig::new().with_flip_rates(0.2, 0.2),
        );
        let mut sampler = NoisySampler::new(noise, Some(42));
        let counts = sampler.prepare_and_measure("0", 10_000).unwrap();
        let flipped = *counts.get("1").unwrap_or(&0);
        assert!(
            flipped > 1500 && flipped < 2500,
            "expected roughly 2000 flips, got {}",
            flipped
        );
    }

    #[test]
    fn test_noisy_sampler_rejects_zero_shots() {
        let mut sampler = NoisySampler::ideal(Some(1));
        assert!(sampler.prepare_and_measure("0", 0).is_err());
    }

    #[test]
    fn test_noisy_sampler_rejects_bad_label() {
        let mut sampler = NoisySampler::ideal(Some(1));
        assert!(sampler.prepare_and_measure("0a1", 100).is_err());
    }

    #[test]
    fn test_fixed_sampler_returns_canned_counts() {
        let counts: Counts = [("0".to_string(), 90), ("1".to_string(), 10)]
            .into_iter()
            .collect();
        let mut sampler = FixedSampler::new().with_response("0", counts.clone());
        assert_eq!(sampler.prepare_and_measure("0", 100).unwrap(), counts);
    }

    #[test]
    fn test_fixed_sampler_unknown_state_fails() {
        let mut sampler = FixedSampler::new();
        assert!(sampler.prepare_and_measure("0", 100).is_err());
    }
}
