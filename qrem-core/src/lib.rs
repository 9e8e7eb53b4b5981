//! # QREM Core: Readout Error Mitigation
//!
//! Characterizes a noisy measurement channel and corrects raw measurement
//! counts back toward the noise-free distribution.
//!
//! ## Pipeline
//!
//! 1. **Calibrate**: prepare every computational basis state through a
//!    [`Sampler`] and tabulate a row-stochastic [`ConfusionMatrix`],
//!    rejecting it if its condition number exceeds the configured ceiling
//! 2. **Invert**: turn the confusion matrix into a [`Mitigator`]
//! 3. **Correct**: normalize raw counts, apply the mitigator, and project
//!    the resulting quasi-probabilities onto the closest valid distribution
//!
//! The confusion matrix and mitigator are built once per noise
//! characterization and shared read-only across any number of correction
//! calls; everything else is transient within a single call.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrem_core::{
//!     apply_mitigation, CalibrationConfig, Counts, Mitigator, NoisySampler, ReadoutNoise,
//!     ReadoutNoiseConfig,
//! };
//!
//! # fn main() -> qrem_core::Result<()> {
//! let noise = ReadoutNoise::new(ReadoutNoiseConfig::new().with_flip_rates(0.1, 0.1));
//! let mut sampler = NoisySampler::new(noise, Some(42));
//! let mitigator = Mitigator::build(1, &mut sampler, &CalibrationConfig::default())?;
//!
//! let counts: Counts = [("0".to_string(), 880), ("1".to_string(), 120)]
//!     .into_iter()
//!     .collect();
//! let corrected = apply_mitigation(&counts, 1, 1000, Some(&mitigator))?;
//! assert!((corrected.values().sum::<f64>() - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

pub mod basis;
pub mod confusion;
pub mod distribution;
pub mod error;
pub mod linalg;
pub mod mitigation;
pub mod mitigator;
pub mod noise;
pub mod projector;
pub mod sampler;

pub use confusion::{
    CalibrationConfig, ConfusionMatrix, DEFAULT_CALIBRATION_SHOTS, DEFAULT_CONDITION_THRESHOLD,
};
pub use distribution::{distance, sample_probability_vector, to_probability_vector};
pub use error::{MitigationError, Result};
pub use mitigation::{apply_mitigation, apply_mitigation_with, empirical_probabilities};
pub use mitigator::Mitigator;
pub use noise::{ReadoutNoise, ReadoutNoiseConfig};
pub use projector::{
    closest_positive_distribution, ProjectorConfig, DEFAULT_MAX_PROJECTION_ITERATIONS,
    DEFAULT_PROJECTION_TOLERANCE,
};
pub use sampler::{sample_counts, Counts, FixedSampler, NoisySampler, Sampler};
