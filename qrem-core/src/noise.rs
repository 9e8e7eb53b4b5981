//! Readout noise channel
//!
//! Models classical bit-flip errors at measurement time: each qubit is read
//! out through an independent 2x2 confusion channel. This is the noise
//! source behind the bundled [`crate::sampler::NoisySampler`] and the
//! experiment driver; the mitigation pipeline itself never looks inside it
//! and works with whatever process emits noisy counts.

use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the readout channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadoutNoiseConfig {
    /// P(measure 1 | prepared 0)
    pub p0: f64,
    /// P(measure 0 | prepared 1)
    pub p1: f64,
}

impl Default for ReadoutNoiseConfig {
    fn default() -> Self {
        Self { p0: 0.02, p1: 0.02 }
    }
}

impl ReadoutNoiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flip_rates(mut self, p0: f64, p1: f64) -> Self {
        self.p0 = p0.clamp(0.0, 1.0);
        self.p1 = p1.clamp(0.0, 1.0);
        self
    }

    /// Noise-free configuration
    pub fn ideal() -> Self {
        Self { p0: 0.0, p1: 0.0 }
    }

    /// Copy with both flip rates multiplied by `factor`
    ///
    /// Used to model runs whose effective noise has been suppressed by an
    /// external technique such as decoupling-sequence insertion.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            p0: (self.p0 * factor).clamp(0.0, 1.0),
            p1: (self.p1 * factor).clamp(0.0, 1.0),
        }
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Per-qubit independent readout confusion channel
#[derive(Debug, Clone)]
pub struct ReadoutNoise {
    config: ReadoutNoiseConfig,
}

impl ReadoutNoise {
    pub fn new(config: ReadoutNoiseConfig) -> Self {
        Self { config }
    }

    pub fn ideal() -> Self {
        Self::new(ReadoutNoiseConfig::ideal())
    }

    pub fn config(&self) -> &ReadoutNoiseConfig {
        &self.config
    }

    /// The 2x2 channel for a single qubit: [[1-p0, p1], [p0, 1-p1]]
    pub fn single_qubit_matrix(&self) -> [[f64; 2]; 2] {
        let p0 = self.config.p0;
        let p1 = self.config.p1;
        [[1.0 - p0, p1], [p0, 1.0 - p1]]
    }

    /// Push a probability vector through the channel
    ///
    /// The transition probability from true state `i` to outcome `j` is the
    /// product of per-bit flip factors, qubits flipping independently.
    pub fn apply(&self, probs: &[f64], n_qubits: usize) -> Vec<f64> {
        let p0 = self.config.p0;
        let p1 = self.config.p1;

        if p0 < 1e-12 && p1 < 1e-12 {
            return probs.to_vec();
        }

        let dim = 1 << n_qubits;
        let mut noisy = vec![0.0; dim];

        for (i, &prob) in probs.iter().enumerate() {
            if prob < 1e-15 {
                continue;
            }
            for (outcome, slot) in noisy.iter_mut().enumerate() {
                let mut transition = prob;
                for q in 0..n_qubits {
                    let true_bit = (i >> q) & 1;
                    let measured_bit = (outcome >> q) & 1;
                    transition *= match (true_bit, measured_bit) {
                        (0, 0) => 1.0 - p0,
                        (0, 1) => p0,
                        (1, 0) => p1,
                        _ => 1.0 - p1,
                    };
                }
                *slot += transition;
            }
        }

        // Guard against drift from accumulated rounding
        let total: f64 = noisy.iter().sum();
        if total > 1e-12 {
            for p in &mut noisy {
                *p /= total;
            }
        }

        noisy
    }
}
