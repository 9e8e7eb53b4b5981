//! # QREM Experiments
//!
//! Thin orchestration layer over `qrem-core`: repeats measurement trials
//! under several noise and correction configurations and aggregates how far
//! each one lands from the noiseless baseline.

pub mod experiment;

pub use experiment::{
    random_target_distribution, run_experiment, run_trial, CaseDistances, ExperimentConfig,
    ExperimentReport,
};
