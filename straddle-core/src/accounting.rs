//! P&L accounting: slippage, flat per-trade cost, daily aggregation.
//!
//! Slippage is charged per leg as `entry_price * slippage_rate * 2`, covering
//! both the opening and the closing fill. The flat cost is charged once per
//! leg. Either can be zero, which gives the frictionless and cost-only views
//! of the same trades.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DailyPnl, PricedTradeRecord, TradeRecord};

#[derive(Debug, Error, PartialEq)]
pub enum CostError {
    #[error("lot size must be a positive finite number, got {0}")]
    InvalidLotSize(f64),

    #[error("cost per trade must be a non-negative finite number, got {0}")]
    InvalidCost(f64),

    #[error("slippage rate must be a non-negative finite number, got {0}")]
    InvalidSlippage(f64),
}

/// Execution friction and contract size applied to every trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Units per leg (the P&L multiplier).
    pub lot_size: f64,
    /// Flat cost deducted from each leg.
    pub cost_per_trade: f64,
    /// Fraction of entry price lost to slippage on each fill.
    pub slippage_rate: f64,
}

impl CostModel {
    pub fn new(lot_size: f64, cost_per_trade: f64, slippage_rate: f64) -> Result<Self, CostError> {
        if !lot_size.is_finite() || lot_size <= 0.0 {
            return Err(CostError::InvalidLotSize(lot_size));
        }
        if !cost_per_trade.is_finite() || cost_per_trade < 0.0 {
            return Err(CostError::InvalidCost(cost_per_trade));
        }
        if !slippage_rate.is_finite() || slippage_rate < 0.0 {
            return Err(CostError::InvalidSlippage(slippage_rate));
        }
        Ok(Self {
            lot_size,
            cost_per_trade,
            slippage_rate,
        })
    }

    /// Same lot size, no cost and no slippage.
    pub fn frictionless(&self) -> Self {
        Self {
            lot_size: self.lot_size,
            cost_per_trade: 0.0,
            slippage_rate: 0.0,
        }
    }

    /// Round-trip slippage for one leg, in price units.
    pub fn slippage(&self, entry_price: f64) -> f64 {
        entry_price * self.slippage_rate * 2.0
    }
}

/// Price a single trade.
pub fn price_trade(trade: &TradeRecord, costs: &CostModel) -> PricedTradeRecord {
    let slippage_long = costs.slippage(trade.entry_price);
    let slippage_short = costs.slippage(trade.entry_price);

    let pnl_long = (trade.exit_price_long - trade.entry_price - slippage_long) * costs.lot_size
        - costs.cost_per_trade;
    let pnl_short = (trade.entry_price - trade.exit_price_short - slippage_short) * costs.lot_size
        - costs.cost_per_trade;

    PricedTradeRecord {
        trade: trade.clone(),
        slippage_long,
        slippage_short,
        pnl_long,
        pnl_short,
        total_pnl: pnl_long + pnl_short,
    }
}

pub fn price_trades(trades: &[TradeRecord], costs: &CostModel) -> Vec<PricedTradeRecord> {
    trades.iter().map(|t| price_trade(t, costs)).collect()
}

/// Sum total P&L per date, ordered by date.
pub fn aggregate_daily(priced: &[PricedTradeRecord]) -> Vec<DailyPnl> {
    let mut by_date: BTreeMap<_, f64> = BTreeMap::new();
    for p in priced {
        *by_date.entry(p.date()).or_insert(0.0) += p.total_pnl;
    }
    by_date
        .into_iter()
        .map(|(date, total_pnl)| DailyPnl { date, total_pnl })
        .collect()
}

/// Headline numbers for a daily P&L series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlSummary {
    pub trading_days: usize,
    pub total_pnl: f64,
    /// Mean daily P&L; 0.0 for an empty series.
    pub average_daily_pnl: f64,
}

impl PnlSummary {
    pub fn from_daily(daily: &[DailyPnl]) -> Self {
        let trading_days = daily.len();
        let total_pnl: f64 = daily.iter().map(|d| d.total_pnl).sum();
        let average_daily_pnl = if trading_days == 0 {
            0.0
        } else {
            total_pnl / trading_days as f64
        };
        Self {
            trading_days,
            total_pnl,
            average_daily_pnl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn trade(date: NaiveDate, entry: f64, exit_long: f64, exit_short: f64) -> TradeRecord {
        TradeRecord {
            date,
            entry_time: NaiveTime::from_hms_opt(9, 16, 0).unwrap(),
            entry_price: entry,
            exit_time_long: NaiveTime::from_hms_opt(15, 25, 0).unwrap(),
            exit_time_short: NaiveTime::from_hms_opt(15, 25, 0).unwrap(),
            exit_price_long: exit_long,
            exit_price_short: exit_short,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn cost_model_rejects_bad_values() {
        assert_eq!(
            CostModel::new(0.0, 0.0, 0.0),
            Err(CostError::InvalidLotSize(0.0))
        );
        assert_eq!(
            CostModel::new(25.0, -1.0, 0.0),
            Err(CostError::InvalidCost(-1.0))
        );
        assert!(matches!(
            CostModel::new(25.0, 0.0, f64::INFINITY),
            Err(CostError::InvalidSlippage(_))
        ));
    }

    #[test]
    fn reference_cost_scenario() {
        let costs = CostModel::new(25.0, 200.0, 0.0005).unwrap();
        let p = price_trade(&trade(d(2), 100.0, 110.0, 95.0), &costs);

        let slip = 100.0 * 0.0005 * 2.0;
        assert_eq!(p.slippage_long, slip);
        assert_eq!(p.slippage_short, slip);
        assert!((slip - 0.1).abs() < 1e-12);

        let long = (110.0 - 100.0 - slip) * 25.0 - 200.0;
        let short = (100.0 - 95.0 - slip) * 25.0 - 200.0;
        assert_eq!(p.pnl_long, long);
        assert_eq!(p.pnl_short, short);
        assert_eq!(p.total_pnl, long + short);
    }

    #[test]
    fn frictionless_is_pure_price_difference() {
        let costs = CostModel::new(25.0, 200.0, 0.0005).unwrap().frictionless();
        let p = price_trade(&trade(d(2), 100.0, 104.0, 98.0), &costs);
        assert_eq!(p.slippage_long, 0.0);
        assert_eq!(p.pnl_long, 100.0);
        assert_eq!(p.pnl_short, 50.0);
    }

    #[test]
    fn straddle_without_stops_loses_only_friction() {
        // Both legs exit at the same price, so price moves cancel out.
        let costs = CostModel::new(10.0, 5.0, 0.001).unwrap();
        let p = price_trade(&trade(d(2), 200.0, 230.0, 230.0), &costs);
        let slip = 200.0 * 0.001 * 2.0;
        let expected = -2.0 * slip * 10.0 - 2.0 * 5.0;
        assert!((p.total_pnl - expected).abs() < 1e-9);
    }

    #[test]
    fn aggregate_daily_groups_and_orders_by_date() {
        let costs = CostModel::new(1.0, 0.0, 0.0).unwrap();
        let priced = price_trades(
            &[
                trade(d(3), 100.0, 101.0, 100.0),
                trade(d(2), 100.0, 102.0, 100.0),
                trade(d(3), 100.0, 103.0, 100.0),
            ],
            &costs,
        );
        let daily = aggregate_daily(&priced);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0], DailyPnl { date: d(2), total_pnl: 2.0 });
        assert_eq!(daily[1], DailyPnl { date: d(3), total_pnl: 4.0 });
    }

    #[test]
    fn summary_of_empty_series_is_zero() {
        let s = PnlSummary::from_daily(&[]);
        assert_eq!(s.trading_days, 0);
        assert_eq!(s.total_pnl, 0.0);
        assert_eq!(s.average_daily_pnl, 0.0);
    }

    #[test]
    fn summary_mean_and_total() {
        let daily = vec![
            DailyPnl { date: d(2), total_pnl: 100.0 },
            DailyPnl { date: d(3), total_pnl: -40.0 },
        ];
        let s = PnlSummary::from_daily(&daily);
        assert_eq!(s.trading_days, 2);
        assert_eq!(s.total_pnl, 60.0);
        assert_eq!(s.average_daily_pnl, 30.0);
    }
}
