//! Solver configuration and file loading.

use std::path::Path;

use passive_motion_core::AlgorithmConfig;
use serde::{Deserialize, Serialize};

use crate::error::SolverResult;

/// A receiver or transmitter position from the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Device identifier
    pub id: String,
    /// X position in region coordinates
    pub x: f32,
    /// Y position in region coordinates
    pub y: f32,
}

/// Configuration for one solver instance.
///
/// Loaded from a JSON file; every field is optional and falls back to its
/// default. Region bounds of zero leave detection cycles as no-ops until
/// [`set_region_bounds`](crate::engine::SolverEngine::set_region_bounds) is
/// called at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Name of the monitored region, used in logs and device registration
    pub region_name: String,
    /// Region X extent
    pub region_x_max: f32,
    /// Region Y extent
    pub region_y_max: f32,
    /// Milliseconds between detection cycles
    pub update_period_ms: u64,
    /// Detection algorithm tuning
    pub algorithm: AlgorithmConfig,
    /// Receivers known at startup
    pub receivers: Vec<DeviceSpec>,
    /// Transmitters known at startup
    pub transmitters: Vec<DeviceSpec>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            region_name: "region".to_owned(),
            region_x_max: 0.0,
            region_y_max: 0.0,
            update_period_ms: 500,
            algorithm: AlgorithmConfig::default(),
            receivers: Vec::new(),
            transmitters: Vec::new(),
        }
    }
}

impl SolverConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> SolverResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
