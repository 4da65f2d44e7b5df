//! Per-day straddle simulation.
//!
//! Each calendar day is simulated in isolation:
//! 1. Both legs open at the close of the bar stamped exactly at the entry time.
//! 2. Every bar from entry to exit (inclusive) is checked against both stops.
//!    The long stop sits `stop_loss` below entry, the short stop the same
//!    distance above. A close equal to the stop counts as a breach.
//! 3. A leg whose stop never triggers exits at the close of the bar stamped
//!    exactly at the exit time.
//!
//! A day without an exact entry or exit bar produces no trade. There is no
//! interpolation and no nearest-bar fallback.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{LegExit, PriceBar, TradeRecord};

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("stop-loss distance must be a non-negative finite number, got {0}")]
    InvalidStopLoss(f64),

    #[error("entry time {entry} is after exit time {exit}")]
    EntryAfterExit { entry: NaiveTime, exit: NaiveTime },
}

/// Entry/exit window and stop distance, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    /// Absolute price distance from entry to each leg's stop.
    pub stop_loss: f64,
}

impl SimulatorConfig {
    pub fn new(
        entry_time: NaiveTime,
        exit_time: NaiveTime,
        stop_loss: f64,
    ) -> Result<Self, SimulationError> {
        if !stop_loss.is_finite() || stop_loss < 0.0 {
            return Err(SimulationError::InvalidStopLoss(stop_loss));
        }
        if entry_time > exit_time {
            return Err(SimulationError::EntryAfterExit {
                entry: entry_time,
                exit: exit_time,
            });
        }
        Ok(Self {
            entry_time,
            exit_time,
            stop_loss,
        })
    }
}

/// Why a day produced no trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingEntryBar,
    MissingExitBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDay {
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// Trades in date order plus the days that were dropped.
#[derive(Debug, Clone, Default)]
pub struct SimulationOutput {
    pub trades: Vec<TradeRecord>,
    pub skipped: Vec<SkippedDay>,
}

impl SimulationOutput {
    /// Number of distinct dates seen in the input.
    pub fn days_seen(&self) -> usize {
        self.trades.len() + self.skipped.len()
    }
}

/// Split a time-ordered series into contiguous per-date slices.
pub fn group_by_day(bars: &[PriceBar]) -> Vec<(NaiveDate, &[PriceBar])> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=bars.len() {
        if i == bars.len() || bars[i].date() != bars[start].date() {
            groups.push((bars[start].date(), &bars[start..i]));
            start = i;
        }
    }
    groups
}

/// Simulate one day. `bars` must all share `date` and be in timestamp order.
///
/// If several bars share the entry or exit timestamp, the first one is used.
/// A window whose exit bar precedes its entry bar scans no bars, so both legs
/// close at the exit bar.
pub fn simulate_day(
    date: NaiveDate,
    bars: &[PriceBar],
    config: &SimulatorConfig,
) -> Result<TradeRecord, SkipReason> {
    let entry_idx = first_bar_at(bars, date.and_time(config.entry_time))
        .ok_or(SkipReason::MissingEntryBar)?;
    let exit_idx = first_bar_at(bars, date.and_time(config.exit_time))
        .ok_or(SkipReason::MissingExitBar)?;

    let entry_price = bars[entry_idx].close;
    let stop_long = entry_price - config.stop_loss;
    let stop_short = entry_price + config.stop_loss;

    let mut long_exit: Option<LegExit> = None;
    let mut short_exit: Option<LegExit> = None;

    for bar in bars.get(entry_idx..=exit_idx).unwrap_or(&[]) {
        if long_exit.is_none() && bar.close <= stop_long {
            long_exit = Some(LegExit::at(bar));
        }
        if short_exit.is_none() && bar.close >= stop_short {
            short_exit = Some(LegExit::at(bar));
        }
        if long_exit.is_some() && short_exit.is_some() {
            break;
        }
    }

    let scheduled = LegExit::at(&bars[exit_idx]);
    let long = long_exit.unwrap_or(scheduled);
    let short = short_exit.unwrap_or(scheduled);

    Ok(TradeRecord {
        date,
        entry_time: config.entry_time,
        entry_price,
        exit_time_long: long.timestamp.time(),
        exit_time_short: short.timestamp.time(),
        exit_price_long: long.price,
        exit_price_short: short.price,
    })
}

/// Simulate every date in the series, emitting at most one trade per date.
///
/// The input is expected in timestamp order; an unsorted series is sorted
/// on a copy before grouping. The sort is stable, so bars sharing a
/// timestamp keep their input order and the first of them is the one traded.
pub fn simulate(bars: &[PriceBar], config: &SimulatorConfig) -> SimulationOutput {
    let bars: Cow<'_, [PriceBar]> = if is_time_ordered(bars) {
        Cow::Borrowed(bars)
    } else {
        let mut sorted = bars.to_vec();
        sorted.sort_by_key(|b| b.timestamp);
        Cow::Owned(sorted)
    };

    let mut output = SimulationOutput::default();
    for (date, day) in group_by_day(&bars) {
        match simulate_day(date, day, config) {
            Ok(trade) => output.trades.push(trade),
            Err(reason) => output.skipped.push(SkippedDay { date, reason }),
        }
    }
    output
}

/// Index of the first bar stamped exactly `ts`.
fn first_bar_at(bars: &[PriceBar], ts: NaiveDateTime) -> Option<usize> {
    let idx = bars.partition_point(|b| b.timestamp < ts);
    bars.get(idx).filter(|b| b.timestamp == ts).map(|_| idx)
}

fn is_time_ordered(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
}
