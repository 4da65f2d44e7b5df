//! TradeRecord: one simulated day of the long + short straddle.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::bar::PriceBar;

/// Outcome of a single simulated day.
///
/// Both legs open at the same entry bar and close independently, either on
/// their stop or at the scheduled exit. Field names are the trade log's
/// column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Entry Time")]
    pub entry_time: NaiveTime,
    #[serde(rename = "Entry Price")]
    pub entry_price: f64,
    #[serde(rename = "Exit Time Long")]
    pub exit_time_long: NaiveTime,
    #[serde(rename = "Exit Time Short")]
    pub exit_time_short: NaiveTime,
    #[serde(rename = "Exit Price Long")]
    pub exit_price_long: f64,
    #[serde(rename = "Exit Price Short")]
    pub exit_price_short: f64,
}

impl TradeRecord {
    /// True if the long leg left the market before `scheduled_exit`.
    pub fn long_stopped_before(&self, scheduled_exit: NaiveTime) -> bool {
        self.exit_time_long < scheduled_exit
    }

    /// True if the short leg left the market before `scheduled_exit`.
    pub fn short_stopped_before(&self, scheduled_exit: NaiveTime) -> bool {
        self.exit_time_short < scheduled_exit
    }
}

/// Where and when one leg was closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegExit {
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl LegExit {
    /// Exit at the close of `bar`.
    pub fn at(bar: &PriceBar) -> Self {
        Self {
            timestamp: bar.timestamp,
            price: bar.close,
        }
    }
}
