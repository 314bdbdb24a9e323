//! Configuration management
//!
//! Loads the JSON configuration file holding scan parameters and I/O paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanParams,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        Ok(config)
    }
}

/// Tunable scan parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanParams {
    /// Pivot/ATR half-window in bars (default: 14)
    #[serde(default = "default_length")]
    pub length: usize,

    /// Slope multiplier applied to ATR / length (default: 1.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Trendline noise guard band, relative (default: 0.005 = 0.5%)
    #[serde(default = "default_trend_buffer")]
    pub trend_buffer: f64,

    /// Level deduplication tolerance, relative (default: 0.01 = 1%)
    #[serde(default = "default_level_tolerance")]
    pub level_tolerance: f64,

    /// Volume surge gate in percent, strict greater-than (default: 50.0)
    #[serde(default = "default_volume_surge_threshold")]
    pub volume_surge_threshold: f64,

    /// Rolling volume SMA window in bars (default: 20)
    #[serde(default = "default_volume_sma_window")]
    pub volume_sma_window: usize,

    /// Trailing distinct-trading-date window for final signal filtering
    /// (default: 10)
    #[serde(default = "default_recent_date_window")]
    pub recent_date_window: usize,
}

fn default_length() -> usize {
    14
}
fn default_multiplier() -> f64 {
    1.0
}
fn default_trend_buffer() -> f64 {
    0.005
}
fn default_level_tolerance() -> f64 {
    0.01
}
fn default_volume_surge_threshold() -> f64 {
    50.0
}
fn default_volume_sma_window() -> usize {
    20
}
fn default_recent_date_window() -> usize {
    10
}

impl Default for ScanParams {
    fn default() -> Self {
        ScanParams {
            length: 14,
            multiplier: 1.0,
            trend_buffer: 0.005,
            level_tolerance: 0.01,
            volume_surge_threshold: 50.0,
            volume_sma_window: 20,
            recent_date_window: 10,
        }
    }
}

/// Input data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: String,
    pub universe_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            data_dir: "data".to_string(),
            universe_file: "universe.txt".to_string(),
        }
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub results_dir: String,
    pub signals_file: String,
    pub computed_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            results_dir: "results".to_string(),
            signals_file: "breakout_signals.csv".to_string(),
            computed_file: "breakout_computed.csv".to_string(),
        }
    }
}
