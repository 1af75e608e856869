//! JSON and CSV export of an analysis run.
//!
//! - **JSON**: config, fingerprints, thresholds, calendar summary and the full report
//! - **CSV**: `regimes.csv` (one row per classified day, with the moving
//!   averages for charting) and `tagged_trades.csv` (trade log with labels)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regimelab_core::analysis::AnalysisError;
use regimelab_core::fingerprint::{dataset_hash, ConfigHash, DatasetHash};
use regimelab_core::regime::{CalendarSummary, VolatilityThresholds};
use regimelab_core::{
    MarketAnalysis, PriceSeries, RegimeConfig, RegimeMetrics, RegimeReport, TaggedTrade, Trade,
};
use serde::{Deserialize, Serialize};

/// Bumped whenever the JSON layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisExport {
    pub schema_version: u32,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
    pub config: RegimeConfig,
    pub thresholds: Option<VolatilityThresholds>,
    pub calendar: CalendarSummary,
    pub overall: Option<RegimeMetrics>,
    pub report: RegimeReport,
}

impl AnalysisExport {
    pub fn new(
        analysis: &MarketAnalysis<'_>,
        series: &PriceSeries,
        trades: &[Trade],
        report: RegimeReport,
    ) -> Result<Self> {
        let calendar = analysis.regimes().ok_or(AnalysisError::NotClassified)?;
        let config = analysis.config().clone();
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            config_hash: config.config_hash(),
            dataset_hash: dataset_hash(series, trades),
            thresholds: calendar.thresholds(),
            calendar: calendar.summary(),
            overall: report.overall(&config),
            config,
            report,
        })
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(export: &AnalysisExport) -> Result<String> {
    serde_json::to_string_pretty(export).context("failed to serialize analysis to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Classified days joined with their indicator values.
///
/// Columns: date, close, ma_short, ma_long, atr, trend, volatility
pub fn export_regimes_csv(analysis: &MarketAnalysis<'_>) -> Result<String> {
    let calendar = analysis.regimes().ok_or(AnalysisError::NotClassified)?;
    let daily = analysis.daily().ok_or(AnalysisError::NotPrepared)?;

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close",
        "ma_short",
        "ma_long",
        "atr",
        "trend",
        "volatility",
    ])?;

    for day in daily.rows() {
        let Some(regime) = calendar.get(day.date) else {
            continue;
        };
        wtr.write_record([
            day.date.to_string(),
            format!("{:.6}", day.close),
            format!("{:.6}", day.ma_short),
            format!("{:.6}", day.ma_long),
            format!("{:.6}", regime.atr),
            regime.trend.to_string(),
            regime.volatility.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: entry_time, entry_date, pnl, return_pct, trend, volatility
pub fn export_tagged_trades_csv(trades: &[TaggedTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_time",
        "entry_date",
        "pnl",
        "return_pct",
        "trend",
        "volatility",
    ])?;

    for t in trades {
        wtr.write_record([
            t.trade.entry_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            t.entry_date().to_string(),
            format!("{:.2}", t.pnl()),
            format!("{:.6}", t.return_pct),
            t.trend.to_string(),
            t.volatility.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `regimes.csv` and `tagged_trades.csv` into `dir`, creating it if
/// needed. Returns the written paths.
pub fn save_csv_exports(
    analysis: &MarketAnalysis<'_>,
    report: &RegimeReport,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let files = [
        ("regimes.csv", export_regimes_csv(analysis)?),
        ("tagged_trades.csv", export_tagged_trades_csv(&report.trades)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
