//! Human-readable console report.
//!
//! Sections, in print order: classification methodology, classification
//! summary, then trend and volatility performance blocks.

use std::fmt::Write;

use regimelab_core::regime::{CalendarSummary, VolatilityThresholds};
use regimelab_core::{RegimeConfig, RegimeKey, RegimeMetrics, RegimeReport, TrendRegime};

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n=== {title} ===");
}

/// Sharpe line: two decimals, flagged when the bucket is small.
pub fn format_sharpe(metrics: &RegimeMetrics, limited_data_trades: usize) -> String {
    match metrics.sharpe {
        Some(s) if metrics.is_limited_data(limited_data_trades) => {
            format!("Sharpe Ratio: {s:.2} (limited data)")
        }
        Some(s) => format!("Sharpe Ratio: {s:.2}"),
        None => "Sharpe Ratio: Insufficient data".to_string(),
    }
}

/// One indented block per regime bucket.
pub fn format_regime_metrics(name: &str, metrics: &RegimeMetrics, limited_data_trades: usize) -> String {
    format!(
        "  {name}:\n\
         \x20   Number of Trades: {}\n\
         \x20   Win Rate: {:.2}%\n\
         \x20   Average P&L: ${:.2}\n\
         \x20   Total P&L: ${:.2}\n\
         \x20   {}\n",
        metrics.n_trades,
        metrics.win_rate * 100.0,
        metrics.avg_pnl,
        metrics.total_pnl,
        format_sharpe(metrics, limited_data_trades),
    )
}

pub fn methodology(config: &RegimeConfig, thresholds: Option<VolatilityThresholds>) -> String {
    let mut out = String::new();
    heading(&mut out, "Regime Classification Methodology");
    let _ = writeln!(out, "Trend regimes use two exponential moving averages of the close:");
    let _ = writeln!(out, "- Short-term EMA: {} periods", config.short_span);
    let _ = writeln!(out, "- Long-term EMA: {} periods", config.long_span);
    let _ = writeln!(out, "UPTREND: close above long EMA and short EMA rising");
    let _ = writeln!(out, "DOWNTREND: close at or below long EMA and short EMA not rising");
    let _ = writeln!(out, "SIDEWAYS: exactly one of the two conditions holds");

    let _ = writeln!(out, "\nVolatility regimes use ATR (exponentially smoothed true range):");
    let _ = writeln!(out, "- ATR period: {}", config.atr_span);
    let low_pct = config.low_vol_quantile * 100.0;
    let high_pct = config.high_vol_quantile * 100.0;
    match thresholds {
        Some(t) => {
            let _ = writeln!(out, "LOW: ATR <= {:.4} (p{low_pct:.0})", t.low);
            let _ = writeln!(out, "HIGH: ATR >= {:.4} (p{high_pct:.0})", t.high);
        }
        None => {
            let _ = writeln!(out, "LOW: ATR at or below p{low_pct:.0}");
            let _ = writeln!(out, "HIGH: ATR at or above p{high_pct:.0}");
        }
    }
    let _ = writeln!(out, "MEDIUM: everything in between");
    out
}

/// Trade counts per trend label present in the tagged log.
pub fn classification_summary(report: &RegimeReport) -> String {
    let mut out = String::new();
    heading(&mut out, "Regime Classification Summary");
    let _ = writeln!(out, "Total trades: {}", report.trades.len());
    for regime in TrendRegime::ALL {
        let count = report.trades.iter().filter(|t| t.trend == regime).count();
        if count > 0 {
            let _ = writeln!(out, "{regime}: {count} trades");
        }
    }
    out
}

fn block_name(key: &RegimeKey) -> String {
    key.label().to_uppercase()
}

pub fn performance(report: &RegimeReport, config: &RegimeConfig) -> String {
    let mut out = String::new();
    heading(&mut out, "Market Regime Analysis");

    let _ = writeln!(out, "\nTrend Regime Performance:");
    for (key, metrics) in report.trend_metrics() {
        out.push_str(&format_regime_metrics(&block_name(key), metrics, config.limited_data_trades));
    }

    let _ = writeln!(out, "\nVolatility Regime Performance:");
    for (key, metrics) in report.volatility_metrics() {
        out.push_str(&format_regime_metrics(&block_name(key), metrics, config.limited_data_trades));
    }

    if let Some(overall) = report.overall(config) {
        let _ = writeln!(out, "\nAll Trades:");
        out.push_str(&format_regime_metrics("OVERALL", &overall, config.limited_data_trades));
    }
    out
}

/// Days per label for the `regimes` command.
pub fn calendar_summary(summary: &CalendarSummary) -> String {
    let mut out = String::new();
    heading(&mut out, "Regime Calendar");
    let _ = writeln!(out, "Classified days: {}", summary.total_days);
    for (regime, days) in &summary.trend_days {
        let _ = writeln!(out, "{regime}: {days} days");
    }
    for (regime, days) in &summary.volatility_days {
        let _ = writeln!(out, "{regime}_vol: {days} days");
    }
    out
}
