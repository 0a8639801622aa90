//! Filter laboratory CLI.
//!
//! Runs scenario-driven tracking simulations against the `kalman-filter`
//! crate and reports how the estimate compares with the raw sensor.

mod report;
mod scenario;
mod sim;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::scenario::{Scenario, discover_scenarios};

#[derive(Parser)]
#[command(
    name = "filter-lab",
    version,
    about = "Tracking scenarios for the kalman-filter crate"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scenario and print its summary.
    Run {
        /// Path to a scenario TOML file.
        scenario: PathBuf,
        /// Override the scenario's noise seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Directory to write the JSON run report into.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List scenarios found in a directory.
    List {
        /// Directory holding scenario TOML files.
        #[arg(default_value = "scenarios")]
        dir: PathBuf,
    },
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

/// Dev diagnostics via `RUST_LOG`, stderr only; product output stays on
/// stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            scenario,
            seed,
            output,
        } => cmd_run(&scenario, seed, output.as_deref()),
        Command::List { dir } => cmd_list(&dir),
    }
}

fn cmd_run(path: &Path, seed: Option<u64>, output: Option<&Path>) -> Result<()> {
    let scenario = Scenario::load(path).context("load scenario")?;
    debug!(name = %scenario.scenario.name, "scenario loaded");

    info!(name = %scenario.scenario.name, steps = scenario.scenario.steps, "starting run");
    let run = sim::run_scenario(&scenario, seed).context("run scenario")?;

    let summary = &run.summary;
    println!(
        "run: scenario={} steps={} seed={} dropped={}",
        summary.scenario, summary.steps, summary.seed, summary.dropped_measurements
    );
    println!(
        "run: mean_measurement_error={:.4} mean_estimate_error={:.4}",
        summary.mean_measurement_error, summary.mean_estimate_error
    );
    println!(
        "run: final_position_error={:.4} final_covariance_trace={:.4}",
        summary.final_position_error, summary.final_covariance_trace
    );

    if let Some(dir) = output {
        let report_path = report::write_run(dir, &run).context("write report")?;
        println!("run: report={}", report_path.display());
    }
    Ok(())
}

fn cmd_list(dir: &Path) -> Result<()> {
    let scenarios = discover_scenarios(dir).context("discover scenarios")?;
    if scenarios.is_empty() {
        println!("no scenarios in {}", dir.display());
        return Ok(());
    }
    for scenario in &scenarios {
        println!(
            "{}: steps={} dt={} seed={}",
            scenario.scenario.name,
            scenario.scenario.steps,
            scenario.scenario.dt,
            scenario.scenario.seed
        );
    }
    Ok(())
}
