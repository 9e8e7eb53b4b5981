//! Mitigation operator
//!
//! The mitigator is the inverse of a calibrated confusion matrix. Applied to
//! an observed probability vector it undoes the linear part of the readout
//! channel, producing quasi-probabilities that generally need projecting
//! back onto the simplex. It is valid only for the confusion matrix it was
//! built from; recalibrate whenever the underlying noise changes.

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::basis;
use crate::confusion::{CalibrationConfig, ConfusionMatrix};
use crate::error::Result;
use crate::linalg;
use crate::sampler::Sampler;

/// Linear correction operator, the inverse of a confusion matrix
#[derive(Debug, Clone)]
pub struct Mitigator {
    n_qubits: usize,
    matrix: Array2<f64>,
}

impl Mitigator {
    /// Invert a calibrated confusion matrix
    ///
    /// The conditioning guard upstream is a heuristic, not a guarantee, so
    /// singularity is checked independently here.
    pub fn from_confusion(confusion: &ConfusionMatrix) -> Result<Self> {
        let matrix = linalg::invert(confusion.matrix())?;
        debug!("mitigator computed for {} qubits", confusion.n_qubits());
        Ok(Self {
            n_qubits: confusion.n_qubits(),
            matrix,
        })
    }

    /// Calibrate a confusion matrix and invert it in one step
    pub fn build<S: Sampler>(
        n_qubits: usize,
        sampler: &mut S,
        config: &CalibrationConfig,
    ) -> Result<Self> {
        let confusion = ConfusionMatrix::build(n_qubits, sampler, config)?;
        Self::from_confusion(&confusion)
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Correct an observed probability vector into quasi-probabilities
    pub fn apply(&self, probabilities: ArrayView1<f64>) -> Array1<f64> {
        self.matrix.dot(&probabilities)
    }

    /// Human-readable dump of the operator
    pub fn summary(&self) -> String {
        let mut s = format!("Mitigator: {} qubits\n", self.n_qubits);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ReadoutNoise, ReadoutNoiseConfig};
    use crate::sampler::NoisySampler;
    use ndarray::{arr1, arr2, Array2};

    #[test]
    fn test_identity_confusion_gives_identity_mitigator() {
        let confusion = ConfusionMatrix::from_rows(Array2::eye(2), 10.0).unwrap();
        let mitigator = Mitigator::from_confusion(&confusion).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((mitigator.matrix()[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_known_inverse() {
        let confusion =
            ConfusionMatrix::from_rows(arr2(&[[0.9, 0.1], [0.1, 0.9]]), 10.0).unwrap();
        let mitigator = Mitigator::from_confusion(&confusion).unwrap();
        assert!((mitigator.matrix()[[0, 0]] - 1.125).abs() < 1e-12);
        assert!((mitigator.matrix()[[0, 1]] + 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_mitigator_times_confusion_is_identity() {
        let noise = ReadoutNoise::new(ReadoutNoiseConfig::new().with_flip_rates(0.08, 0.08));
        let mut sampler = NoisySampler::new(noise, Some(42));
        let config = CalibrationConfig::new().with_shots(8192);
        let confusion = ConfusionMatrix::build(2, &mut sampler, &config).unwrap();
        let mitigator = Mitigator::from_confusion(&confusion).unwrap();

        let product = mitigator.matrix().dot(confusion.matrix());
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (product[[i, j]] - expected).abs() < 1e-10,
                    "product[{},{}] = {}",
                    i,
                    j,
                    product[[i, j]]
                );
            }
        }
    }

    #[test]
    fn test_apply_known_correction() {
        let confusion =
            ConfusionMatrix::from_rows(arr2(&[[0.9, 0.1], [0.1, 0.9]]), 10.0).unwrap();
        let mitigator = Mitigator::from_confusion(&confusion).unwrap();
        // M . [0.9, 0.1] lands exactly on the clean distribution [1, 0]
        let quasi = mitigator.apply(arr1(&[0.9, 0.1]).view());
        assert!((quasi[0] - 1.0).abs() < 1e-12);
        assert!(quasi[1].abs() < 1e-12);
    }

    #[test]
    fn test_build_convenience() {
        let mut sampler = NoisySampler::ideal(Some(42));
        let mitigator =
            Mitigator::build(1, &mut sampler, &CalibrationConfig::new().with_shots(1000)).unwrap();
        assert_eq!(mitigator.n_qubits(), 1);
    }
}
