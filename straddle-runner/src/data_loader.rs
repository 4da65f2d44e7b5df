//! Minute-bar loading from CSV.
//!
//! The input needs a header with at least a `date` and a `close` column; any
//! other columns are ignored. Rows may arrive in any order and are sorted by
//! timestamp. Every problem with the input is fatal: a bad timestamp or
//! price anywhere aborts the load, because day grouping depends on every
//! row being well formed.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime};
use straddle_core::PriceBar;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open input {path}: {source}")]
    Open { path: PathBuf, source: csv::Error },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' not found in header")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: unparseable close price '{value}'")]
    BadPrice { row: usize, value: String },

    #[error("more than one bar at {0}")]
    DuplicateTimestamp(NaiveDateTime),

    #[error("input contains no bars")]
    Empty,
}

/// Sorted bars plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub bars: Vec<PriceBar>,
    /// BLAKE3 over every timestamp and close, in sorted order.
    pub dataset_hash: String,
}

const DATE_COLUMN: &str = "date";
const CLOSE_COLUMN: &str = "close";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Parse a bar timestamp.
///
/// Offset-suffixed values keep their local wall-clock time, so a bar stamped
/// `09:16:00+05:30` groups under its exchange date at 09:16.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.naive_local())
        })
}

/// Load bars from a CSV file.
pub fn load_bars(path: &Path) -> Result<LoadedData, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    read_bars(reader)
}

/// Load bars from any CSV source (used for in-memory inputs and tests).
pub fn load_bars_from_reader<R: Read>(input: R) -> Result<LoadedData, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    read_bars(reader)
}

fn read_bars<R: Read>(mut reader: csv::Reader<R>) -> Result<LoadedData, LoadError> {
    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let close_idx = column_index(&headers, CLOSE_COLUMN)?;

    let mut bars = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // 1-based, counting the header line.
        let row = i + 2;

        let raw_ts = record.get(date_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            row,
            value: raw_ts.to_string(),
        })?;

        let raw_close = record.get(close_idx).unwrap_or_default();
        let bar = raw_close
            .parse::<f64>()
            .ok()
            .map(|close| PriceBar::new(timestamp, close))
            .filter(|bar| !bar.is_void())
            .ok_or_else(|| LoadError::BadPrice {
                row,
                value: raw_close.to_string(),
            })?;

        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty);
    }

    bars.sort_by_key(|b| b.timestamp);
    if let Some(dup) = bars.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
        return Err(LoadError::DuplicateTimestamp(dup[0].timestamp));
    }

    let dataset_hash = compute_dataset_hash(&bars);
    Ok(LoadedData { bars, dataset_hash })
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(LoadError::MissingColumn(name))
}

/// Compute a deterministic BLAKE3 hash over all bar data.
fn compute_dataset_hash(bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.timestamp.to_string().as_bytes());
        hasher.update(&bar.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
