//! Run manifest export (JSON).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::BacktestConfig;
use crate::metrics::PerformanceSummary;
use crate::runner::{BacktestResult, SCHEMA_VERSION};
use straddle_core::SkippedDay;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub schema_version: u32,
    pub run_id: String,
    pub dataset_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub bar_count: usize,
    pub config: BacktestConfig,
    pub summary: PerformanceSummary,
    pub skipped_days: Vec<SkippedDay>,
    /// Artifact file names, relative to the manifest's directory.
    pub files: Vec<String>,
}

impl RunManifest {
    pub fn new(result: &BacktestResult, files: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: result.run_id.clone(),
            dataset_hash: result.dataset_hash.clone(),
            created_at: chrono::Utc::now(),
            bar_count: result.bar_count,
            config: result.config.clone(),
            summary: result.summary.clone(),
            skipped_days: result.skipped.clone(),
            files,
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)
        .context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}

/// Load a manifest, rejecting schema versions newer than this build.
pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("Failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}
