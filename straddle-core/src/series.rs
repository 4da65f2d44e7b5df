//! Cumulative P&L and drawdown series derived from daily P&L.

use crate::domain::DailyPnl;

/// Running sum of daily P&L, in the order given.
pub fn cumulative_pnl(daily: &[DailyPnl]) -> Vec<f64> {
    daily
        .iter()
        .scan(0.0, |acc, d| {
            *acc += d.total_pnl;
            Some(*acc)
        })
        .collect()
}

/// Distance of each point below the running peak of `cumulative` (always <= 0).
///
/// The peak starts at the first value, not at zero, so a series that opens
/// with a loss shows no drawdown on its first day.
pub fn drawdown(cumulative: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative
        .iter()
        .map(|&c| {
            peak = peak.max(c);
            c - peak
        })
        .collect()
}

/// Deepest drawdown in absolute P&L units (<= 0, or 0.0 for an empty series).
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    drawdown(cumulative).into_iter().fold(0.0, f64::min)
}
