//! Scenario file parsing and validation.
//!
//! Scenarios are TOML files describing a 1-D constant-velocity tracking
//! run: how the truth moves, how the sensor degrades it, and how the filter
//! is configured. See `scenarios/` for examples.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

/// A parsed scenario: metadata plus truth, sensor, and filter settings.
///
/// Missing sections default to sensible values so a minimal scenario only
/// needs a name and a step count.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Scenario {
    pub scenario: ScenarioMeta,
    #[serde(default)]
    pub truth: TruthConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Scenario metadata: identifier and run shape.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub name: String,
    /// Number of simulation ticks.
    pub steps: u32,
    /// Simulated seconds per tick.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Seed for the noise stream; reruns with the same seed are identical.
    #[serde(default)]
    pub seed: u64,
}

/// How the true target moves.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TruthConfig {
    pub initial_position: f64,
    pub initial_velocity: f64,
    /// Uniform amplitude of per-tick velocity perturbations.
    pub velocity_jitter: f64,
}

/// How the sensor degrades the truth.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    /// Uniform amplitude of position measurement noise.
    pub noise_amplitude: f64,
    /// Probability that a tick produces no measurement.
    pub dropout_rate: f64,
    /// Measurement variance reported to the filter.
    pub variance: f64,
}

/// How the filter is configured.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Process noise intensity (diagonal of the transition noise).
    pub transition_noise: f64,
    pub initial_position: f64,
    pub initial_velocity: f64,
    /// Prior variance on both state dimensions.
    pub prior_variance: f64,
}

fn default_dt() -> f64 {
    1.0
}

impl Default for TruthConfig {
    fn default() -> Self {
        Self {
            initial_position: 0.0,
            initial_velocity: 1.0,
            velocity_jitter: 0.0,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            noise_amplitude: 0.5,
            dropout_rate: 0.0,
            variance: 0.1,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            transition_noise: 1e-4,
            initial_position: 0.0,
            initial_velocity: 0.0,
            prior_variance: 1.0,
        }
    }
}

impl Scenario {
    /// Load and validate a scenario file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read scenario {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&contents)
            .with_context(|| format!("parse scenario {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("validate scenario {}", path.display()))?;
        Ok(scenario)
    }

    #[cfg(test)]
    pub fn parse_str(contents: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(contents).context("parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.scenario.name)?;
        if self.scenario.steps == 0 {
            bail!("scenario.steps must be > 0");
        }
        if !self.scenario.dt.is_finite() || self.scenario.dt <= 0.0 {
            bail!("scenario.dt must be positive and finite");
        }
        if !self.truth.velocity_jitter.is_finite() || self.truth.velocity_jitter < 0.0 {
            bail!("truth.velocity_jitter must be >= 0");
        }
        if !self.sensor.noise_amplitude.is_finite() || self.sensor.noise_amplitude < 0.0 {
            bail!("sensor.noise_amplitude must be >= 0");
        }
        if !self.sensor.dropout_rate.is_finite()
            || self.sensor.dropout_rate < 0.0
            || self.sensor.dropout_rate >= 1.0
        {
            bail!("sensor.dropout_rate must be in [0, 1)");
        }
        if !self.sensor.variance.is_finite() || self.sensor.variance <= 0.0 {
            bail!("sensor.variance must be > 0");
        }
        if !self.filter.transition_noise.is_finite() || self.filter.transition_noise < 0.0 {
            bail!("filter.transition_noise must be >= 0");
        }
        if !self.filter.prior_variance.is_finite() || self.filter.prior_variance <= 0.0 {
            bail!("filter.prior_variance must be > 0");
        }
        Ok(())
    }
}

/// Discover and load all scenario files from a directory.
///
/// Returns scenarios sorted by name. Errors if duplicate names are found.
pub fn discover_scenarios(dir: &Path) -> Result<Vec<Scenario>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut scenarios = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("read scenario dir {}", dir.display()))?
    {
        let entry = entry.context("read scenario entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        scenarios.push(Scenario::load(&path)?);
    }
    scenarios.sort_by(|left, right| left.scenario.name.cmp(&right.scenario.name));
    for pair in scenarios.windows(2) {
        if pair[0].scenario.name == pair[1].scenario.name {
            return Err(anyhow!("duplicate scenario name {}", pair[0].scenario.name));
        }
    }
    Ok(scenarios)
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("scenario.name must be non-empty");
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("scenario.name must use [a-z0-9_-] only");
    }
    Ok(())
}
