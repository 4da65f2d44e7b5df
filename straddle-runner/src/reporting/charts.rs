//! Diagnostic charts.
//!
//! Building and drawing are separate steps. `build_charts` turns the daily
//! P&L series into named `ChartSpec`s and touches nothing on disk;
//! `render_svg` draws one of them to a file.

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use straddle_core::{cumulative_pnl, drawdown, DailyPnl};

/// Number of equal-width bins in the daily P&L histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Rendered figure size in pixels.
pub const FIGURE_SIZE: (u32, u32) = (1200, 600);

/// One bin of a histogram: `[lower, upper)`, except the last bin which is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartKind {
    /// A value per trading day, in date order.
    Line(Vec<(NaiveDate, f64)>),
    Histogram(Vec<HistogramBin>),
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// File stem of the rendered chart.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.name)
    }
}

/// Cumulative P&L, daily P&L distribution, drawdown; in that order.
pub fn build_charts(daily: &[DailyPnl]) -> Vec<ChartSpec> {
    let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
    let cumulative = cumulative_pnl(daily);
    let dd = drawdown(&cumulative);
    let totals: Vec<f64> = daily.iter().map(|d| d.total_pnl).collect();

    vec![
        ChartSpec {
            name: "cumulative_pnl".into(),
            title: "Cumulative P&L".into(),
            x_label: "Date".into(),
            y_label: "Cumulative P&L".into(),
            kind: ChartKind::Line(dates.iter().copied().zip(cumulative).collect()),
        },
        ChartSpec {
            name: "pnl_distribution".into(),
            title: "Histogram of Distribution".into(),
            x_label: "Daily P&L".into(),
            y_label: "Frequency".into(),
            kind: ChartKind::Histogram(histogram_bins(&totals, HISTOGRAM_BINS)),
        },
        ChartSpec {
            name: "drawdown".into(),
            title: "Drawdown over Time".into(),
            x_label: "Date".into(),
            y_label: "Drawdown".into(),
            kind: ChartKind::Line(dates.into_iter().zip(dd).collect()),
        },
    ]
}

/// Equal-width bins spanning `[min, max]` of `values`.
///
/// All-equal input gets a unit-wide range centred on the value. Empty input
/// or `bins == 0` yields no bins.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = min_max(values.iter().copied()).unwrap_or((0.0, 0.0));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Widen a degenerate or empty range so plotters has something to map.
fn padded_range(bounds: Option<(f64, f64)>) -> (f64, f64) {
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

// ─── Rendering ──────────────────────────────────────────────────────

/// Draw `spec` as an SVG file at `path`.
pub fn render_svg(spec: &ChartSpec, path: &Path) -> Result<()> {
    let fail = |e: &dyn std::fmt::Display| {
        anyhow!("failed to render chart {} to {}: {e}", spec.name, path.display())
    };

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(&e))?;

    match &spec.kind {
        ChartKind::Line(points) => {
            let x_max = points.len().saturating_sub(1).max(1) as f64;
            let (y_lo, y_hi) = padded_range(min_max(points.iter().map(|p| p.1)));
            let label_date = |x: &f64| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                points
                    .get(idx as usize)
                    .map(|p| p.0.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            };

            let mut chart = ChartBuilder::on(&root)
                .caption(&spec.title, ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d(0f64..x_max, y_lo..y_hi)
                .map_err(|e| fail(&e))?;

            chart
                .configure_mesh()
                .x_desc(spec.x_label.as_str())
                .y_desc(spec.y_label.as_str())
                .x_labels(8)
                .x_label_formatter(&label_date)
                .draw()
                .map_err(|e| fail(&e))?;

            chart
                .draw_series(LineSeries::new(
                    points.iter().enumerate().map(|(i, p)| (i as f64, p.1)),
                    &BLUE,
                ))
                .map_err(|e| fail(&e))?;
        }
        ChartKind::Histogram(bins) => {
            let x_bounds = match (bins.first(), bins.last()) {
                (Some(first), Some(last)) => Some((first.lower, last.upper)),
                _ => None,
            };
            let (x_lo, x_hi) = padded_range(x_bounds);
            let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

            let mut chart = ChartBuilder::on(&root)
                .caption(&spec.title, ("sans-serif", 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(x_lo..x_hi, 0f64..max_count as f64 * 1.1)
                .map_err(|e| fail(&e))?;

            chart
                .configure_mesh()
                .x_desc(spec.x_label.as_str())
                .y_desc(spec.y_label.as_str())
                .draw()
                .map_err(|e| fail(&e))?;

            chart
                .draw_series(bins.iter().map(|b| {
                    Rectangle::new(
                        [(b.lower, 0.0), (b.upper, b.count as f64)],
                        BLUE.mix(0.6).filled(),
                    )
                }))
                .map_err(|e| fail(&e))?;
        }
    }

    root.present().map_err(|e| fail(&e))?;
    Ok(())
}
