//! Straddle CLI: run the intraday straddle backtest.
//!
//! Commands:
//! - `run`: simulate, price and report a backtest from a TOML config and/or flags
//! - `config`: print the default configuration as TOML

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use straddle_runner::config::parse_time_of_day;
use straddle_runner::reporting::ArtifactManager;
use straddle_runner::runner::run_backtest;
use straddle_runner::{BacktestConfig, BacktestResult};

#[derive(Parser)]
#[command(
    name = "straddle",
    about = "Intraday long + short straddle backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest and write its artifacts.
    Run(RunArgs),
    /// Print the default configuration as TOML.
    Config,
}

/// Flags override values from `--config`, which override the defaults.
#[derive(Args, Debug)]
struct RunArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minute-bar CSV with `date` and `close` columns.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Entry time of day (HH:MM or HH:MM:SS).
    #[arg(long, value_parser = parse_time)]
    entry_time: Option<NaiveTime>,

    /// Scheduled exit time of day (HH:MM or HH:MM:SS).
    #[arg(long, value_parser = parse_time)]
    exit_time: Option<NaiveTime>,

    /// Stop distance from entry, in price units.
    #[arg(long)]
    stop_loss: Option<f64>,

    #[arg(long)]
    lot_size: Option<f64>,

    /// Flat cost charged per leg.
    #[arg(long)]
    cost_per_trade: Option<f64>,

    /// Slippage as a fraction of the entry price.
    #[arg(long)]
    slippage_rate: Option<f64>,

    /// Zero both the per-trade cost and slippage.
    #[arg(long, default_value_t = false)]
    no_costs: bool,

    /// Directory for run artifacts.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip chart rendering.
    #[arg(long, default_value_t = false)]
    no_charts: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_backtest_cmd(args),
        Commands::Config => {
            print!("{}", BacktestConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn run_backtest_cmd(args: RunArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => BacktestConfig::from_file(path)?,
        None => BacktestConfig::default(),
    };
    let config = apply_overrides(base, &args);
    config.validate()?;

    info!(
        "running {} from {} to {} with stop {}",
        config.backtest.input.display(),
        config.backtest.entry_time,
        config.backtest.exit_time,
        config.backtest.stop_loss
    );

    let result = run_backtest(&config)
        .with_context(|| format!("backtest on {} failed", config.backtest.input.display()))?;

    print_summary(&result);

    let manager = ArtifactManager::new(&config.output.dir)?;
    let paths = manager.save_run(&result, config.output.charts)?;
    println!("Artifacts saved to: {}", paths.run_dir.display());

    Ok(())
}

fn apply_overrides(mut config: BacktestConfig, args: &RunArgs) -> BacktestConfig {
    if let Some(input) = &args.input {
        config.backtest.input = input.clone();
    }
    if let Some(t) = args.entry_time {
        config.backtest.entry_time = t;
    }
    if let Some(t) = args.exit_time {
        config.backtest.exit_time = t;
    }
    if let Some(stop) = args.stop_loss {
        config.backtest.stop_loss = stop;
    }
    if let Some(lot) = args.lot_size {
        config.costs.lot_size = lot;
    }
    if let Some(cost) = args.cost_per_trade {
        config.costs.cost_per_trade = cost;
    }
    if let Some(rate) = args.slippage_rate {
        config.costs.slippage_rate = rate;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if args.no_charts {
        config.output.charts = false;
    }
    if args.no_costs {
        config = config.without_costs();
    }
    config
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    parse_time_of_day(raw).map_err(|e| e.to_string())
}

fn print_summary(result: &BacktestResult) {
    let s = &result.summary;
    println!();
    println!("=== Backtest Result ===");
    println!("Input:          {}", result.config.backtest.input.display());
    println!(
        "Window:         {} to {} (stop {})",
        result.config.backtest.entry_time,
        result.config.backtest.exit_time,
        result.config.backtest.stop_loss
    );
    println!("Bars:           {}", result.bar_count);
    println!(
        "Trading Days:   {} ({} skipped)",
        s.trading_days, s.skipped_days
    );
    println!();
    println!("--- Performance ---");
    println!("Total P&L:      {:.2}", s.total_pnl);
    println!("Average Daily:  {:.2}", s.average_daily_pnl);
    println!(
        "Win Rate:       {:.1}% ({} up / {} down)",
        s.win_rate * 100.0,
        s.winning_days,
        s.losing_days
    );
    println!("Best Day:       {:.2}", s.best_day);
    println!("Worst Day:      {:.2}", s.worst_day);
    println!("Max Drawdown:   {:.2}", s.max_drawdown);
    println!("Long Stops:     {}", s.long_stop_outs);
    println!("Short Stops:    {}", s.short_stop_outs);
    println!();
}
