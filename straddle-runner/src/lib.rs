//! Straddle Runner: configuration, loading, orchestration, reporting.
//!
//! This crate builds on `straddle-core` to provide:
//! - TOML configuration with validated defaults
//! - Minute-bar CSV loading with a dataset fingerprint
//! - Single-run pipeline: simulate, price, aggregate, summarize
//! - CSV logs, SVG charts and a JSON manifest per run

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{BacktestConfig, ConfigError, RunId};
pub use data_loader::{load_bars, load_bars_from_reader, parse_timestamp, LoadError, LoadedData};
pub use metrics::PerformanceSummary;
pub use reporting::{ArtifactManager, ArtifactPaths, ChartSpec, RunManifest};
pub use runner::{run_backtest, run_backtest_from_bars, BacktestResult, RunError, SCHEMA_VERSION};
