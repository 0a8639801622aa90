//! Run report persistence.
//!
//! Writes a completed simulation run as pretty-printed JSON for later
//! analysis, one file per scenario and seed. Float fields survive the
//! round trip bit for bit (`serde_json`'s `float_roundtrip` feature;
//! the default parse path is lossy in the last ulp).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sim::SimulationRun;

/// Write the run report into `dir`, creating it as needed.
///
/// Returns the path written.
pub fn write_run(dir: &Path, run: &SimulationRun) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create report dir {}", dir.display()))?;
    let path = report_path(dir, &run.summary.scenario, run.summary.seed);
    let mut payload = serde_json::to_string_pretty(run).context("serialize run report")?;
    payload.push('\n');
    fs::write(&path, payload).with_context(|| format!("write report {}", path.display()))?;
    Ok(path)
}

pub fn report_path(dir: &Path, scenario: &str, seed: u64) -> PathBuf {
    dir.join(format!("{scenario}-{seed}.json"))
}
