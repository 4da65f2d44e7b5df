//! Property tests for simulator and accounting invariants.
//!
//! Uses proptest to verify:
//! 1. Trade count: one trade per day with exact entry and exit bars, zero otherwise
//! 2. Stop placement: each leg exits at its first breach or at the scheduled exit
//! 3. P&L identity: total equals long plus short
//! 4. Series: cumulative is the running sum, drawdown is never positive

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use straddle_core::{
    aggregate_daily, cumulative_pnl, drawdown, price_trades, simulate, CostModel, DailyPnl,
    PriceBar, SimulatorConfig,
};

// ── Strategies (proptest) ────────────────────────────────────────────

const ENTRY_MINUTE: u32 = 5;
const EXIT_MINUTE: u32 = 40;

fn t(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(9 + minute / 60, minute % 60, 0).unwrap()
}

fn arb_price() -> impl Strategy<Value = f64> {
    (50.0..150.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// One day: a close for each of 60 minutes, plus whether each minute is present.
///
/// Minute 0 is always kept so every generated day appears in the series even
/// when its entry and exit bars are later dropped.
fn arb_day() -> impl Strategy<Value = Vec<(u32, f64)>> {
    prop::collection::vec((any::<bool>(), arb_price()), 60).prop_map(|mins| {
        mins.into_iter()
            .enumerate()
            .filter(|(i, (keep, _))| {
                let m = *i as u32;
                *keep || m == 0 || m == ENTRY_MINUTE || m == EXIT_MINUTE
            })
            .map(|(i, (_, p))| (i as u32, p))
            .collect()
    })
}

fn build_bars(days: &[(Vec<(u32, f64)>, bool, bool)]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut bars = Vec::new();
    for (i, (minutes, keep_entry, keep_exit)) in days.iter().enumerate() {
        let date = start + chrono::Days::new(i as u64);
        for &(m, price) in minutes {
            if m == ENTRY_MINUTE && !keep_entry {
                continue;
            }
            if m == EXIT_MINUTE && !keep_exit {
                continue;
            }
            bars.push(PriceBar::new(date.and_time(t(m)), price));
        }
    }
    bars
}

fn config(stop: f64) -> SimulatorConfig {
    SimulatorConfig::new(t(ENTRY_MINUTE), t(EXIT_MINUTE), stop).unwrap()
}

proptest! {
    #[test]
    fn one_trade_per_complete_day(
        days in prop::collection::vec((arb_day(), any::<bool>(), any::<bool>()), 1..8),
        stop in 0.0..30.0_f64,
    ) {
        let bars = build_bars(&days);
        let out = simulate(&bars, &config(stop));
        let expected = days.iter().filter(|(_, e, x)| *e && *x).count();
        prop_assert_eq!(out.trades.len(), expected);
        prop_assert_eq!(out.days_seen(), days.len());
    }

    #[test]
    fn legs_exit_at_first_breach_or_schedule(
        day in arb_day(),
        stop in 0.0..30.0_f64,
    ) {
        let bars = build_bars(&[(day, true, true)]);
        let out = simulate(&bars, &config(stop));
        prop_assert_eq!(out.trades.len(), 1);
        let trade = &out.trades[0];

        let window: Vec<&PriceBar> = bars
            .iter()
            .filter(|b| b.time() >= t(ENTRY_MINUTE) && b.time() <= t(EXIT_MINUTE))
            .collect();
        let entry = window[0].close;
        let scheduled = window[window.len() - 1];

        let long = window.iter().find(|b| b.close <= entry - stop).copied().unwrap_or(scheduled);
        let short = window.iter().find(|b| b.close >= entry + stop).copied().unwrap_or(scheduled);

        prop_assert_eq!(trade.entry_price, entry);
        prop_assert_eq!(trade.exit_time_long, long.time());
        prop_assert_eq!(trade.exit_price_long, long.close);
        prop_assert_eq!(trade.exit_time_short, short.time());
        prop_assert_eq!(trade.exit_price_short, short.close);
    }

    #[test]
    fn total_pnl_is_sum_of_legs(
        days in prop::collection::vec((arb_day(), Just(true), Just(true)), 1..6),
        stop in 0.0..30.0_f64,
        lot in 1.0..100.0_f64,
        cost in 0.0..500.0_f64,
        slip in 0.0..0.01_f64,
    ) {
        let out = simulate(&build_bars(&days), &config(stop));
        let costs = CostModel::new(lot, cost, slip).unwrap();
        for p in price_trades(&out.trades, &costs) {
            prop_assert_eq!(p.total_pnl, p.pnl_long + p.pnl_short);
            prop_assert_eq!(p.slippage_long, p.trade.entry_price * slip * 2.0);
            prop_assert_eq!(p.slippage_long, p.slippage_short);
        }
    }

    #[test]
    fn drawdown_is_cumulative_minus_running_max(values in prop::collection::vec(-1000.0..1000.0_f64, 0..50)) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let daily: Vec<DailyPnl> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| DailyPnl { date: start + chrono::Days::new(i as u64), total_pnl: v })
            .collect();

        let cum = cumulative_pnl(&daily);
        let mut running = 0.0;
        for (i, c) in cum.iter().enumerate() {
            running += values[i];
            prop_assert_eq!(*c, running);
        }

        let dd = drawdown(&cum);
        let mut peak = f64::NEG_INFINITY;
        for (c, d) in cum.iter().zip(&dd) {
            peak = peak.max(*c);
            prop_assert!(*d <= 0.0);
            prop_assert_eq!(*d, c - peak);
        }
    }

    #[test]
    fn daily_aggregation_preserves_total(
        days in prop::collection::vec((arb_day(), Just(true), Just(true)), 1..6),
    ) {
        let out = simulate(&build_bars(&days), &config(10.0));
        let costs = CostModel::new(25.0, 200.0, 0.0005).unwrap();
        let priced = price_trades(&out.trades, &costs);
        let daily = aggregate_daily(&priced);
        prop_assert_eq!(daily.len(), priced.len());
        for (d, p) in daily.iter().zip(&priced) {
            prop_assert_eq!(d.date, p.trade.date);
            prop_assert_eq!(d.total_pnl, p.total_pnl);
        }
    }
}
