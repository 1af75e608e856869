//! Per-regime performance statistics.
//!
//! Buckets: every trend label (including `unclassified`, so trades outside
//! the calendar still get a row) and the three classified volatility labels.
//! Empty buckets are omitted rather than zero-filled.

use super::sharpe::regime_sharpe;
use crate::config::RegimeConfig;
use crate::domain::{RegimeKey, TaggedTrade, TrendRegime, VolatilityRegime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Performance of the trades in one regime bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeMetrics {
    pub n_trades: usize,
    /// Fraction of trades with pnl > 0.
    pub win_rate: f64,
    pub avg_pnl: f64,
    pub total_pnl: f64,
    /// Absent when the bucket fails the sample-size or variance gates.
    pub sharpe: Option<f64>,
}

impl RegimeMetrics {
    /// Metrics for a trade subset, `None` if the subset is empty.
    pub fn compute(trades: &[&TaggedTrade], config: &RegimeConfig) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }
        let n = trades.len();
        let winners = trades.iter().filter(|t| t.is_winner()).count();
        let total_pnl: f64 = trades.iter().map(|t| t.pnl()).sum();

        Some(Self {
            n_trades: n,
            win_rate: winners as f64 / n as f64,
            avg_pnl: total_pnl / n as f64,
            total_pnl,
            sharpe: regime_sharpe(trades, config.min_sharpe_trades, config.min_sharpe_days),
        })
    }

    /// A Sharpe ratio computed from fewer trades than `threshold`.
    pub fn is_limited_data(&self, threshold: usize) -> bool {
        self.sharpe.is_some() && self.n_trades < threshold
    }
}

/// Metrics for every non-empty regime bucket.
pub fn regime_metrics(
    trades: &[TaggedTrade],
    config: &RegimeConfig,
) -> BTreeMap<RegimeKey, RegimeMetrics> {
    let trend_keys = TrendRegime::ALL.into_iter().map(RegimeKey::Trend);
    let vol_keys = VolatilityRegime::CLASSIFIED
        .into_iter()
        .map(RegimeKey::Volatility);

    trend_keys
        .chain(vol_keys)
        .filter_map(|key| {
            let subset: Vec<&TaggedTrade> = trades.iter().filter(|t| in_bucket(t, key)).collect();
            RegimeMetrics::compute(&subset, config).map(|m| (key, m))
        })
        .collect()
}

fn in_bucket(trade: &TaggedTrade, key: RegimeKey) -> bool {
    match key {
        RegimeKey::Trend(trend) => trade.trend == trend,
        RegimeKey::Volatility(volatility) => trade.volatility == volatility,
    }
}
