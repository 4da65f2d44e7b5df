//! Artifact manager for persisting run outputs.

mod manifest;

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::reporting::charts::{build_charts, render_svg};
use crate::reporting::export::{write_daily_pnl, write_priced_trades, write_trade_log};
use crate::runner::BacktestResult;

pub use manifest::{read_manifest, write_manifest, RunManifest};

/// Length of the run-id prefix used as the run directory name.
const RUN_DIR_ID_LEN: usize = 12;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub manifest: PathBuf,
    pub trades_csv: PathBuf,
    pub priced_trades_csv: PathBuf,
    pub daily_pnl_csv: PathBuf,
    /// Empty when chart rendering is disabled.
    pub charts: Vec<PathBuf>,
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!(
                "Failed to create artifact output directory {}",
                output_dir.display()
            )
        })?;
        Ok(Self { output_dir })
    }

    /// Directory a run's artifacts land in.
    pub fn run_dir(&self, result: &BacktestResult) -> PathBuf {
        let id = result
            .run_id
            .get(..RUN_DIR_ID_LEN)
            .unwrap_or(result.run_id.as_str());
        self.output_dir.join(id)
    }

    /// Save complete run artifacts. Any failed write aborts the save.
    pub fn save_run(&self, result: &BacktestResult, render_charts: bool) -> Result<ArtifactPaths> {
        let run_dir = self.run_dir(result);
        std::fs::create_dir_all(&run_dir)
            .context("Failed to create run artifact directory")?;

        let trades_csv = run_dir.join("trades.csv");
        write_file(&trades_csv, |w| write_trade_log(w, &result.trades))?;

        let priced_trades_csv = run_dir.join("priced_trades.csv");
        write_file(&priced_trades_csv, |w| write_priced_trades(w, &result.priced))?;

        let daily_pnl_csv = run_dir.join("daily_pnl.csv");
        write_file(&daily_pnl_csv, |w| write_daily_pnl(w, &result.daily))?;

        let mut charts = Vec::new();
        if render_charts {
            for spec in build_charts(&result.daily) {
                let path = run_dir.join(spec.file_name());
                render_svg(&spec, &path)?;
                charts.push(path);
            }
        }

        let files = [&trades_csv, &priced_trades_csv, &daily_pnl_csv]
            .into_iter()
            .chain(charts.iter())
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        let manifest_path = run_dir.join("manifest.json");
        write_manifest(&manifest_path, &RunManifest::new(result, files))?;

        info!("wrote artifacts to {}", run_dir.display());

        Ok(ArtifactPaths {
            run_dir,
            manifest: manifest_path,
            trades_csv,
            priced_trades_csv,
            daily_pnl_csv,
            charts,
        })
    }
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("Failed to write {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
