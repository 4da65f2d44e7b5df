//! Performance summary: pure functions over the daily P&L series.
//!
//! Everything here takes already-priced data in and returns numbers out; no
//! dependency on loading or the simulator.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use straddle_core::{cumulative_pnl, max_drawdown, DailyPnl, PnlSummary, TradeRecord};

/// Aggregate statistics for a single backtest run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    pub trading_days: usize,
    pub total_pnl: f64,
    pub average_daily_pnl: f64,
    pub winning_days: usize,
    pub losing_days: usize,
    /// Fraction of trading days with positive P&L.
    pub win_rate: f64,
    pub best_day: f64,
    pub worst_day: f64,
    /// Deepest fall of cumulative P&L below its running peak (<= 0).
    pub max_drawdown: f64,
    /// Long legs closed by their stop before the scheduled exit.
    pub long_stop_outs: usize,
    /// Short legs closed by their stop before the scheduled exit.
    pub short_stop_outs: usize,
    /// Dates in the input that lacked an exact entry or exit bar.
    pub skipped_days: usize,
}

impl PerformanceSummary {
    pub fn compute(
        daily: &[DailyPnl],
        trades: &[TradeRecord],
        exit_time: NaiveTime,
        skipped_days: usize,
    ) -> Self {
        let headline = PnlSummary::from_daily(daily);
        let winning_days = daily.iter().filter(|d| d.is_winner()).count();
        let losing_days = daily.iter().filter(|d| d.is_loser()).count();

        Self {
            trading_days: headline.trading_days,
            total_pnl: headline.total_pnl,
            average_daily_pnl: headline.average_daily_pnl,
            winning_days,
            losing_days,
            win_rate: win_rate(winning_days, headline.trading_days),
            best_day: best_day(daily),
            worst_day: worst_day(daily),
            max_drawdown: max_drawdown(&cumulative_pnl(daily)),
            long_stop_outs: trades
                .iter()
                .filter(|t| t.long_stopped_before(exit_time))
                .count(),
            short_stop_outs: trades
                .iter()
                .filter(|t| t.short_stopped_before(exit_time))
                .count(),
            skipped_days,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

pub fn win_rate(winning_days: usize, trading_days: usize) -> f64 {
    if trading_days == 0 {
        return 0.0;
    }
    winning_days as f64 / trading_days as f64
}

/// Largest single-day P&L; 0.0 for an empty series.
pub fn best_day(daily: &[DailyPnl]) -> f64 {
    daily
        .iter()
        .map(|d| d.total_pnl)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Smallest single-day P&L; 0.0 for an empty series.
pub fn worst_day(daily: &[DailyPnl]) -> f64 {
    daily
        .iter()
        .map(|d| d.total_pnl)
        .reduce(f64::min)
        .unwrap_or(0.0)
}
