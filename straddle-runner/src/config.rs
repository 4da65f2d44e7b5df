//! Serializable backtest configuration.
//!
//! A run is fully described by one `BacktestConfig`: the input series, the
//! entry/exit window and stop distance, the cost model, and where to write
//! artifacts. It is loaded from TOML, optionally overridden from the command
//! line, validated once, and then passed by reference into the pipeline.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use straddle_core::{CostError, CostModel, SimulationError, SimulatorConfig};
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid time of day '{0}' (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Costs(#[from] CostError),
}

/// Complete configuration for a single backtest run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BacktestConfig {
    #[serde(default)]
    pub backtest: BacktestSection,
    #[serde(default)]
    pub costs: CostSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Input series and the daily trading window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BacktestSection {
    /// CSV with `date` and `close` columns.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(with = "time_of_day", default = "default_entry_time")]
    pub entry_time: NaiveTime,
    #[serde(with = "time_of_day", default = "default_exit_time")]
    pub exit_time: NaiveTime,
    /// Absolute price distance to each leg's stop.
    #[serde(default = "default_stop_loss")]
    pub stop_loss: f64,
}

/// Contract size and execution friction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CostSection {
    #[serde(default = "default_lot_size")]
    pub lot_size: f64,
    #[serde(default = "default_cost_per_trade")]
    pub cost_per_trade: f64,
    #[serde(default = "default_slippage_rate")]
    pub slippage_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Render the three SVG charts.
    #[serde(default = "default_charts")]
    pub charts: bool,
}

fn default_input() -> PathBuf {
    PathBuf::from("nifty50.csv")
}

const DEFAULT_ENTRY_TIME: NaiveTime = clock_time(9, 16);
const DEFAULT_EXIT_TIME: NaiveTime = clock_time(15, 25);

/// Whole-minute time of day, checked at compile time.
const fn clock_time(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(t) => t,
        None => panic!("time of day out of range"),
    }
}

fn default_entry_time() -> NaiveTime {
    DEFAULT_ENTRY_TIME
}

fn default_exit_time() -> NaiveTime {
    DEFAULT_EXIT_TIME
}

fn default_stop_loss() -> f64 {
    100.0
}

fn default_lot_size() -> f64 {
    25.0
}

fn default_cost_per_trade() -> f64 {
    200.0
}

fn default_slippage_rate() -> f64 {
    0.0005
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_charts() -> bool {
    true
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            input: default_input(),
            entry_time: default_entry_time(),
            exit_time: default_exit_time(),
            stop_loss: default_stop_loss(),
        }
    }
}

impl Default for CostSection {
    fn default() -> Self {
        Self {
            lot_size: default_lot_size(),
            cost_per_trade: default_cost_per_trade(),
            slippage_rate: default_slippage_rate(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            charts: default_charts(),
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value the pipeline will rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulator_config()?;
        self.cost_model()?;
        Ok(())
    }

    pub fn simulator_config(&self) -> Result<SimulatorConfig, ConfigError> {
        Ok(SimulatorConfig::new(
            self.backtest.entry_time,
            self.backtest.exit_time,
            self.backtest.stop_loss,
        )?)
    }

    pub fn cost_model(&self) -> Result<CostModel, ConfigError> {
        Ok(CostModel::new(
            self.costs.lot_size,
            self.costs.cost_per_trade,
            self.costs.slippage_rate,
        )?)
    }

    /// Zero both the flat cost and the slippage, keeping the lot size.
    pub fn without_costs(mut self) -> Self {
        self.costs.cost_per_trade = 0.0;
        self.costs.slippage_rate = 0.0;
        self
    }

    /// Deterministic BLAKE3 hash over every parameter that affects results.
    ///
    /// Output settings are excluded: the same run written elsewhere keeps
    /// its id.
    pub fn run_id(&self) -> RunId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.backtest.input.to_string_lossy().as_bytes());
        hasher.update(format_time_of_day(self.backtest.entry_time).as_bytes());
        hasher.update(format_time_of_day(self.backtest.exit_time).as_bytes());
        hasher.update(&self.backtest.stop_loss.to_le_bytes());
        hasher.update(&self.costs.lot_size.to_le_bytes());
        hasher.update(&self.costs.cost_per_trade.to_le_bytes());
        hasher.update(&self.costs.slippage_rate.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ConfigError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ConfigError::InvalidTime(raw.to_string()))
}

/// `HH:MM`, or `HH:MM:SS` when seconds are non-zero.
pub fn format_time_of_day(t: NaiveTime) -> String {
    use chrono::Timelike;
    if t.second() == 0 {
        t.format("%H:%M").to_string()
    } else {
        t.format("%H:%M:%S").to_string()
    }
}

mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time_of_day(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
