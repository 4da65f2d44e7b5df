//! Every input and output problem aborts the run; nothing is half-written
//! silently.

use std::path::PathBuf;

use straddle_runner::config::BacktestConfig;
use straddle_runner::data_loader::{load_bars, LoadError};
use straddle_runner::reporting::ArtifactManager;
use straddle_runner::runner::{run_backtest, RunError};

fn write_input(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("bars.csv");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn hard_fail_unparseable_timestamp_anywhere() {
    let dir = tempfile::tempdir().unwrap();
    // The bad row is on a day that would otherwise be skipped.
    let path = write_input(
        &dir,
        "date,close\n\
         2024-01-02 09:16:00,100\n\
         2024-01-02 15:25:00,101\n\
         2024-01-03 9.30,100\n",
    );
    let mut config = BacktestConfig::default();
    config.backtest.input = path;
    let err = run_backtest(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Data(LoadError::BadTimestamp { row: 4, .. })
    ));
}

#[test]
fn hard_fail_missing_date_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "timestamp,close\n2024-01-02 09:16:00,100\n");
    assert!(matches!(
        load_bars(&path),
        Err(LoadError::MissingColumn("date"))
    ));
}

#[test]
fn hard_fail_non_numeric_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "date,close\n2024-01-02 09:16:00,n/a\n");
    assert!(matches!(
        load_bars(&path),
        Err(LoadError::BadPrice { row: 2, .. })
    ));
}

#[test]
fn hard_fail_nan_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "date,close\n2024-01-02 09:16:00,NaN\n");
    assert!(matches!(load_bars(&path), Err(LoadError::BadPrice { .. })));
}

#[test]
fn hard_fail_unwritable_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("results");
    std::fs::write(&blocker, "not a directory").unwrap();
    assert!(ArtifactManager::new(&blocker).is_err());
}

#[test]
fn hard_fail_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backtest.toml");
    std::fs::write(&path, "[backtest]\nstop_loss = \"far\"\n").unwrap();
    assert!(BacktestConfig::from_file(&path).is_err());
}
