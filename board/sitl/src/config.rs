//! Simulator configuration file (TOML)

use anyhow::{Context, Result};
use motionwatch::MotionConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::imu::Scenario;

#[derive(Debug, Clone, Deserialize)]
pub struct SitlConfig {
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: Scenario,
    /// Samples between two shake bursts; values below 4 are raised to 4
    pub shake_every: u32,
    /// Advance a simulated clock instead of sleeping
    pub virtual_time: bool,
    /// Stop after this many polls; run forever when absent
    pub iterations: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::Stationary,
            shake_every: 40,
            virtual_time: false,
            iterations: None,
        }
    }
}

impl Default for SitlConfig {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

pub fn parse_config(text: &str) -> Result<SitlConfig> {
    toml::from_str(text).context("Failed to parse config")
}

pub fn load_config(path: &Path) -> Result<SitlConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    parse_config(&text).with_context(|| format!("Invalid config file: {:?}", path))
}
