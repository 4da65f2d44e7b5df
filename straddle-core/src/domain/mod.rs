//! Domain types for the straddle backtester

pub mod bar;
pub mod pnl;
pub mod trade;

pub use bar::PriceBar;
pub use pnl::{DailyPnl, PricedTradeRecord};
pub use trade::{LegExit, TradeRecord};
