//! CSV logs for the three pipeline stages.
//!
//! - **Trade log**: one row per simulated day, straight from the simulator
//! - **Priced trade log**: trade log columns plus slippage and per-leg P&L
//! - **Daily P&L log**: one row per trading day
//!
//! Floats are written in their shortest round-trip form, so reading a log
//! back yields bit-identical values.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use straddle_core::{DailyPnl, PricedTradeRecord, TradeRecord};

// ─── Trade log ──────────────────────────────────────────────────────

pub fn write_trade_log<W: Write>(out: W, trades: &[TradeRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for trade in trades {
        wtr.serialize(trade)
            .with_context(|| format!("failed to write trade for {}", trade.date))?;
    }
    wtr.flush().context("failed to flush trade log")?;
    Ok(())
}

pub fn read_trade_log<R: Read>(input: R) -> Result<Vec<TradeRecord>> {
    let mut rdr = csv::Reader::from_reader(input);
    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("malformed trade log row {}", i + 2)))
        .collect()
}

// ─── Priced trade log ───────────────────────────────────────────────

/// Flat CSV row for a priced trade; the trade columns come first.
#[derive(Debug, Serialize, Deserialize)]
struct PricedRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Entry Time")]
    entry_time: NaiveTime,
    #[serde(rename = "Entry Price")]
    entry_price: f64,
    #[serde(rename = "Exit Time Long")]
    exit_time_long: NaiveTime,
    #[serde(rename = "Exit Time Short")]
    exit_time_short: NaiveTime,
    #[serde(rename = "Exit Price Long")]
    exit_price_long: f64,
    #[serde(rename = "Exit Price Short")]
    exit_price_short: f64,
    #[serde(rename = "Slippage Long")]
    slippage_long: f64,
    #[serde(rename = "Slippage Short")]
    slippage_short: f64,
    #[serde(rename = "P&L Long")]
    pnl_long: f64,
    #[serde(rename = "P&L Short")]
    pnl_short: f64,
    #[serde(rename = "Total P&L")]
    total_pnl: f64,
}

impl From<&PricedTradeRecord> for PricedRow {
    fn from(p: &PricedTradeRecord) -> Self {
        let t = &p.trade;
        Self {
            date: t.date,
            entry_time: t.entry_time,
            entry_price: t.entry_price,
            exit_time_long: t.exit_time_long,
            exit_time_short: t.exit_time_short,
            exit_price_long: t.exit_price_long,
            exit_price_short: t.exit_price_short,
            slippage_long: p.slippage_long,
            slippage_short: p.slippage_short,
            pnl_long: p.pnl_long,
            pnl_short: p.pnl_short,
            total_pnl: p.total_pnl,
        }
    }
}

impl From<PricedRow> for PricedTradeRecord {
    fn from(row: PricedRow) -> Self {
        Self {
            trade: TradeRecord {
                date: row.date,
                entry_time: row.entry_time,
                entry_price: row.entry_price,
                exit_time_long: row.exit_time_long,
                exit_time_short: row.exit_time_short,
                exit_price_long: row.exit_price_long,
                exit_price_short: row.exit_price_short,
            },
            slippage_long: row.slippage_long,
            slippage_short: row.slippage_short,
            pnl_long: row.pnl_long,
            pnl_short: row.pnl_short,
            total_pnl: row.total_pnl,
        }
    }
}

pub fn write_priced_trades<W: Write>(out: W, priced: &[PricedTradeRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for p in priced {
        wtr.serialize(PricedRow::from(p))
            .with_context(|| format!("failed to write priced trade for {}", p.date()))?;
    }
    wtr.flush().context("failed to flush priced trade log")?;
    Ok(())
}

pub fn read_priced_trades<R: Read>(input: R) -> Result<Vec<PricedTradeRecord>> {
    let mut rdr = csv::Reader::from_reader(input);
    rdr.deserialize::<PricedRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map(PricedTradeRecord::from)
                .with_context(|| format!("malformed priced trade row {}", i + 2))
        })
        .collect()
}

// ─── Daily P&L log ──────────────────────────────────────────────────

pub fn write_daily_pnl<W: Write>(out: W, daily: &[DailyPnl]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for day in daily {
        wtr.serialize(day)
            .with_context(|| format!("failed to write daily P&L for {}", day.date))?;
    }
    wtr.flush().context("failed to flush daily P&L log")?;
    Ok(())
}

pub fn read_daily_pnl<R: Read>(input: R) -> Result<Vec<DailyPnl>> {
    let mut rdr = csv::Reader::from_reader(input);
    rdr.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("malformed daily P&L row {}", i + 2)))
        .collect()
}
