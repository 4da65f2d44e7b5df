//! Straddle Core: domain types, per-day simulator, P&L accounting.
//!
//! This crate holds the pure, I/O-free part of the backtester:
//! - Domain types (price bars, trade records, priced trades, daily P&L)
//! - Trade simulator: one long + one short leg per day, independent stops
//! - Accounting: slippage, flat cost, per-date aggregation, summary
//! - Derived series: cumulative P&L and drawdown

pub mod accounting;
pub mod domain;
pub mod series;
pub mod simulator;

pub use accounting::{aggregate_daily, price_trade, price_trades, CostError, CostModel, PnlSummary};
pub use domain::{DailyPnl, LegExit, PriceBar, PricedTradeRecord, TradeRecord};
pub use series::{cumulative_pnl, drawdown, max_drawdown};
pub use simulator::{
    group_by_day, simulate, simulate_day, SimulationError, SimulationOutput, SimulatorConfig,
    SkipReason, SkippedDay,
};
