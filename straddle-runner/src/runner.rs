//! Backtest runner: loading, simulation, accounting and metrics in sequence.
//!
//! Two entry points:
//! - `run_backtest()`: loads the configured CSV, then runs. Used by the CLI.
//! - `run_backtest_from_bars()`: takes an in-memory series. No I/O.
//!
//! Each stage materializes its full output before the next one starts.

use chrono::NaiveTime;
use log::{debug, info};
use straddle_core::{
    aggregate_daily, price_trades, simulate, DailyPnl, PriceBar, PricedTradeRecord, SkippedDay,
    TradeRecord,
};
use thiserror::Error;

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_bars, LoadError};
use crate::metrics::PerformanceSummary;

/// Current schema version for persisted run manifests.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("no trading day had bars at both {entry} and {exit}")]
    NoTrades { entry: NaiveTime, exit: NaiveTime },
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    /// Hash of config id and dataset hash; names the artifact directory.
    pub run_id: RunId,
    pub config: BacktestConfig,
    pub dataset_hash: String,
    pub bar_count: usize,
    pub trades: Vec<TradeRecord>,
    pub priced: Vec<PricedTradeRecord>,
    pub daily: Vec<DailyPnl>,
    pub skipped: Vec<SkippedDay>,
    pub summary: PerformanceSummary,
}

/// Run a backtest from a `BacktestConfig` (loads the input CSV).
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let loaded = load_bars(&config.backtest.input)?;
    info!(
        "loaded {} bars from {}",
        loaded.bars.len(),
        config.backtest.input.display()
    );
    run_backtest_from_bars(config, &loaded.bars, &loaded.dataset_hash)
}

/// Run a backtest on pre-loaded bars. No I/O.
pub fn run_backtest_from_bars(
    config: &BacktestConfig,
    bars: &[PriceBar],
    dataset_hash: &str,
) -> Result<BacktestResult, RunError> {
    let sim_config = config.simulator_config()?;
    let costs = config.cost_model()?;

    let output = simulate(bars, &sim_config);
    for skip in &output.skipped {
        debug!("skipping {}: {:?}", skip.date, skip.reason);
    }
    info!(
        "simulated {} trading days ({} skipped)",
        output.trades.len(),
        output.skipped.len()
    );

    if output.trades.is_empty() {
        return Err(RunError::NoTrades {
            entry: sim_config.entry_time,
            exit: sim_config.exit_time,
        });
    }

    let priced = price_trades(&output.trades, &costs);
    let daily = aggregate_daily(&priced);
    let summary = PerformanceSummary::compute(
        &daily,
        &output.trades,
        sim_config.exit_time,
        output.skipped.len(),
    );

    Ok(BacktestResult {
        run_id: combined_run_id(&config.run_id(), dataset_hash),
        config: config.clone(),
        dataset_hash: dataset_hash.to_string(),
        bar_count: bars.len(),
        trades: output.trades,
        priced,
        daily,
        skipped: output.skipped,
        summary,
    })
}

fn combined_run_id(config_id: &str, dataset_hash: &str) -> RunId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(config_id.as_bytes());
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}
