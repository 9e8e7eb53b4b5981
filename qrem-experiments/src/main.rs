//! Readout-mitigation experiment runner
//!
//! Usage:
//!   cargo run -p qrem-experiments -- --qubits 2 --trials 20 --shots 1000

use anyhow::Result;
use clap::Parser;

use qrem_experiments::{run_experiment, ExperimentConfig};
use qrem_core::ReadoutNoiseConfig;

#[derive(Parser, Debug)]
#[command(name = "qrem-experiments")]
#[command(about = "Compare readout error mitigation strategies over repeated trials")]
struct Args {
    /// Number of measured qubits
    #[arg(short, long, default_value = "2")]
    qubits: usize,

    /// Trials to average over
    #[arg(short, long, default_value = "10")]
    trials: usize,

    /// Shots per trial measurement
    #[arg(short, long, default_value = "1000")]
    shots: usize,

    /// Shots per calibration basis state
    #[arg(long, default_value = "4096")]
    calibration_shots: usize,

    /// P(measure 1 | prepared 0)
    #[arg(long, default_value = "0.05")]
    p0: f64,

    /// P(measure 0 | prepared 1)
    #[arg(long, default_value = "0.05")]
    p1: f64,

    /// Noise multiplier for decoupled runs
    #[arg(long, default_value = "0.25")]
    suppression: f64,

    /// Condition-number ceiling for calibration
    #[arg(long, default_value = "10.0")]
    condition_threshold: f64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = ExperimentConfig {
        trials: args.trials,
        n_qubits: args.qubits,
        shots: args.shots,
        calibration_shots: args.calibration_shots,
        noise: ReadoutNoiseConfig::new().with_flip_rates(args.p0, args.p1),
        decoupling_suppression: args.suppression,
        condition_threshold: args.condition_threshold,
        seed: args.seed,
    };

    let report = run_experiment(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_report();
    }
    Ok(())
}
