//! Experiment driver comparing mitigation configurations
//!
//! Each trial draws a random target distribution, measures it through a
//! readout noise channel under four configurations, and records the
//! Euclidean distance of each result to the noiseless baseline:
//!
//! 1. Noise only
//! 2. Noise with mitigation
//! 3. Noise with decoupling
//! 4. Noise with decoupling and mitigation
//!
//! Decoupling is an external collaborator and is modeled from the outside
//! only: a decoupled run is one whose effective noise rates are scaled down
//! by a suppression factor. How the suppression is achieved on the device
//! is not this crate's business.

use std::collections::HashMap;

use anyhow::Context;
use rand::prelude::*;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use qrem_core::{
    apply_mitigation, distance, sample_counts, CalibrationConfig, Mitigator, NoisySampler,
    ReadoutNoise, ReadoutNoiseConfig, DEFAULT_CALIBRATION_SHOTS, DEFAULT_CONDITION_THRESHOLD,
};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for one experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Trials to average over
    pub trials: usize,
    /// Number of measured qubits
    pub n_qubits: usize,
    /// Shots per trial measurement
    pub shots: usize,
    /// Shots per calibration basis state
    pub calibration_shots: usize,
    /// Readout noise applied to every noisy run
    pub noise: ReadoutNoiseConfig,
    /// Multiplier applied to the noise rates when decoupling is on
    pub decoupling_suppression: f64,
    /// Condition-number ceiling for calibration
    pub condition_threshold: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            n_qubits: 2,
            shots: 1000,
            calibration_shots: DEFAULT_CALIBRATION_SHOTS,
            noise: ReadoutNoiseConfig::default(),
            decoupling_suppression: 0.25,
            condition_threshold: DEFAULT_CONDITION_THRESHOLD,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_qubits(mut self, n_qubits: usize) -> Self {
        self.n_qubits = n_qubits;
        self
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_noise(mut self, noise: ReadoutNoiseConfig) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// =============================================================================
// Results
// =============================================================================

/// Distances to the noiseless baseline for the four noisy configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseDistances {
    pub unmitigated: f64,
    pub mitigated: f64,
    pub decoupled: f64,
    pub decoupled_mitigated: f64,
}

impl CaseDistances {
    fn accumulate(&mut self, other: &CaseDistances) {
        self.unmitigated += other.unmitigated;
        self.mitigated += other.mitigated;
        self.decoupled += other.decoupled;
        self.decoupled_mitigated += other.decoupled_mitigated;
    }

    fn scale(&mut self, factor: f64) {
        self.unmitigated *= factor;
        self.mitigated *= factor;
        self.decoupled *= factor;
        self.decoupled_mitigated *= factor;
    }
}

/// Aggregated outcome of an experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    pub average: CaseDistances,
}

impl ExperimentReport {
    pub fn print_report(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Readout Mitigation Experiment Report");
        println!("{}", "=".repeat(70));

        println!("\n## Setup");
        println!(
            "  qubits: {}   shots: {}   trials: {}",
            self.config.n_qubits, self.config.shots, self.config.trials
        );
        println!(
            "  readout noise: p0={:.3} p1={:.3}   decoupling suppression: {:.2}",
            self.config.noise.p0, self.config.noise.p1, self.config.decoupling_suppression
        );

        println!("\n## Average distance to noiseless baseline");
        println!("  {:<32} {:.6}", "noise only", self.average.unmitigated);
        println!("  {:<32} {:.6}", "noise + decoupling", self.average.decoupled);
        println!("  {:<32} {:.6}", "noise + mitigation", self.average.mitigated);
        println!(
            "  {:<32} {:.6}",
            "noise + decoupling + mitigation", self.average.decoupled_mitigated
        );
        println!();
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Random target distribution standing in for an arbitrary prepared circuit
///
/// Exponential weights normalized to 1 give a uniform draw from the simplex.
pub fn random_target_distribution(n_qubits: usize, rng: &mut StdRng) -> Vec<f64> {
    let dim = 1 << n_qubits;
    let mut weights: Vec<f64> = (0..dim)
        .map(|_| {
            let u: f64 = rng.gen();
            -(1.0 - u).ln()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Run all trials and average the per-case distances
pub fn run_experiment(config: &ExperimentConfig) -> anyhow::Result<ExperimentReport> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let noise = ReadoutNoise::new(config.noise.clone());
    let calibration = CalibrationConfig::new()
        .with_shots(config.calibration_shots)
        .with_condition_threshold(config.condition_threshold);
    let mut calibration_sampler = NoisySampler::new(noise.clone(), config.seed);
    let mitigator = Mitigator::build(config.n_qubits, &mut calibration_sampler, &calibration)
        .context("noise characterization failed")?;
    info!("mitigator calibrated for {} qubits", config.n_qubits);

    let mut totals = CaseDistances::default();
    for trial in 0..config.trials {
        let distances = run_trial(config, &noise, &mitigator, &mut rng)?;
        totals.accumulate(&distances);
        info!("trial {} of {} complete", trial + 1, config.trials);
    }
    totals.scale(1.0 / config.trials as f64);

    Ok(ExperimentReport {
        config: config.clone(),
        average: totals,
    })
}

/// One trial: measure a random target under every configuration
pub fn run_trial(
    config: &ExperimentConfig,
    noise: &ReadoutNoise,
    mitigator: &Mitigator,
    rng: &mut StdRng,
) -> anyhow::Result<CaseDistances> {
    let target = random_target_distribution(config.n_qubits, rng);
    let decoupled_noise =
        ReadoutNoise::new(config.noise.scaled(config.decoupling_suppression));

    // Noiseless baseline all cases are compared against
    let baseline_counts = sample_counts(&target, config.shots, config.n_qubits, rng);
    let baseline = apply_mitigation(&baseline_counts, config.n_qubits, config.shots, None)?;

    let unmitigated = measure_case(&target, noise, None, config, rng)?;
    let mitigated = measure_case(&target, noise, Some(mitigator), config, rng)?;
    let decoupled = measure_case(&target, &decoupled_noise, None, config, rng)?;
    let decoupled_mitigated = measure_case(&target, &decoupled_noise, Some(mitigator), config, rng)?;

    Ok(CaseDistances {
        unmitigated: distance(&baseline, &unmitigated)?,
        mitigated: distance(&baseline, &mitigated)?,
        decoupled: distance(&baseline, &decoupled)?,
        decoupled_mitigated: distance(&baseline, &decoupled_mitigated)?,
    })
}

fn measure_case(
    target: &[f64],
    noise: &ReadoutNoise,
    mitigator: Option<&Mitigator>,
    config: &ExperimentConfig,
    rng: &mut StdRng,
) -> anyhow::Result<HashMap<String, f64>> {
    let noisy_probs = noise.apply(target, config.n_qubits);
    let counts = sample_counts(&noisy_probs, config.shots, config.n_qubits, rng);
    let result = apply_mitigation(&counts, config.n_qubits, config.shots, mitigator)?;
    Ok(result)
}
