//! Reporting and artifact export pipeline.

pub mod artifacts;
pub mod charts;
pub mod export;

pub use artifacts::{ArtifactManager, ArtifactPaths, RunManifest};
pub use charts::{build_charts, histogram_bins, render_svg, ChartKind, ChartSpec, HistogramBin};
pub use export::{
    read_daily_pnl, read_priced_trades, read_trade_log, write_daily_pnl, write_priced_trades,
    write_trade_log,
};
