//! RegimeLab CLI: classify market regimes and break trade performance down by regime.
//!
//! Commands:
//! - `analyze`: load prices and a trade log, classify regimes, report per-regime statistics
//! - `regimes`: classify regimes only and summarize or export the calendar

mod export;
mod loader;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regimelab_core::{MarketAnalysis, RegimeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::export::AnalysisExport;

#[derive(Parser)]
#[command(
    name = "regimelab",
    about = "RegimeLab CLI: market regime classification and regime-attributed trade statistics"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify regimes and report trade performance per regime.
    Analyze {
        /// Price CSV with a `timestamp` (intraday) or `date` (daily) column.
        #[arg(long)]
        prices: PathBuf,

        /// Trade log CSV with `entry_time` and `pnl` columns.
        #[arg(long)]
        trades: PathBuf,

        /// TOML file overriding classification parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Capital used to turn pnl into percentage returns.
        #[arg(long)]
        initial_capital: Option<f64>,

        /// Write the full report as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Directory for regimes.csv and tagged_trades.csv.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Classify regimes only.
    Regimes {
        /// Price CSV with a `timestamp` (intraday) or `date` (daily) column.
        #[arg(long)]
        prices: PathBuf,

        /// TOML file overriding classification parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the regime calendar as CSV to this path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            prices,
            trades,
            config,
            initial_capital,
            json,
            export_dir,
        } => run_analyze(
            &prices,
            &trades,
            config.as_deref(),
            initial_capital,
            json.as_deref(),
            export_dir.as_deref(),
        ),
        Commands::Regimes {
            prices,
            config,
            out,
        } => run_regimes(&prices, config.as_deref(), out.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, initial_capital: Option<f64>) -> Result<RegimeConfig> {
    let mut config = match path {
        Some(p) => RegimeConfig::from_file(p)
            .with_context(|| format!("failed to load config from {}", p.display()))?,
        None => RegimeConfig::default(),
    };
    if let Some(capital) = initial_capital {
        config = config.with_initial_capital(capital);
    }
    Ok(config)
}

fn run_analyze(
    prices_path: &Path,
    trades_path: &Path,
    config_path: Option<&Path>,
    initial_capital: Option<f64>,
    json_path: Option<&Path>,
    export_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, initial_capital)?;
    let series = loader::load_prices(prices_path)
        .with_context(|| format!("failed to load prices from {}", prices_path.display()))?;
    let trades = loader::load_trades(trades_path)
        .with_context(|| format!("failed to load trades from {}", trades_path.display()))?;
    info!(
        price_rows = series.len(),
        intraday = series.is_intraday(),
        trades = trades.len(),
        "loaded inputs"
    );

    let mut analysis = MarketAnalysis::new(&series, config)?;
    analysis.prepare();
    let thresholds = analysis.classify()?.thresholds();
    let result = analysis.analyze_performance(&trades)?;

    let config = analysis.config();
    print!("{}", report::methodology(config, thresholds));
    print!("{}", report::classification_summary(&result));
    print!("{}", report::performance(&result, config));
    println!();

    if let Some(dir) = export_dir {
        for path in export::save_csv_exports(&analysis, &result, dir)? {
            info!(path = %path.display(), "wrote CSV export");
        }
    }

    if let Some(path) = json_path {
        let export = AnalysisExport::new(&analysis, &series, &trades, result)?;
        let json = export::export_json(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote JSON report");
    }

    Ok(())
}

fn run_regimes(prices_path: &Path, config_path: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, None)?;
    let series = loader::load_prices(prices_path)
        .with_context(|| format!("failed to load prices from {}", prices_path.display()))?;

    let mut analysis = MarketAnalysis::new(&series, config)?;
    analysis.prepare();
    let calendar = analysis.classify()?;

    match (calendar.first_date(), calendar.last_date()) {
        (Some(first), Some(last)) => println!("Period: {first} to {last}"),
        _ => println!("No classifiable days in {}", prices_path.display()),
    }
    print!("{}", report::calendar_summary(&calendar.summary()));

    if let Some(path) = out {
        let csv = export::export_regimes_csv(&analysis)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote regime calendar");
    }

    Ok(())
}
