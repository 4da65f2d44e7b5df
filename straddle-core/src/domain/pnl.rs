//! Priced trades and per-day P&L.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trade::TradeRecord;

/// A `TradeRecord` after slippage and per-trade cost have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedTradeRecord {
    pub trade: TradeRecord,
    pub slippage_long: f64,
    pub slippage_short: f64,
    pub pnl_long: f64,
    pub pnl_short: f64,
    pub total_pnl: f64,
}

impl PricedTradeRecord {
    pub fn date(&self) -> NaiveDate {
        self.trade.date
    }
}

/// Total P&L for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPnl {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Total P&L")]
    pub total_pnl: f64,
}

impl DailyPnl {
    pub fn is_winner(&self) -> bool {
        self.total_pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.total_pnl < 0.0
    }
}
