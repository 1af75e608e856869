//! Result of a regime performance analysis.

use super::stats::RegimeMetrics;
use crate::config::RegimeConfig;
use crate::domain::{RegimeKey, TaggedTrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-bucket metrics plus the row-level tagged trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub metrics: BTreeMap<RegimeKey, RegimeMetrics>,
    pub trades: Vec<TaggedTrade>,
}

impl RegimeReport {
    pub fn get(&self, key: RegimeKey) -> Option<&RegimeMetrics> {
        self.metrics.get(&key)
    }

    /// Trend buckets in reporting order.
    pub fn trend_metrics(&self) -> impl Iterator<Item = (&RegimeKey, &RegimeMetrics)> + '_ {
        self.metrics.iter().filter(|(k, _)| k.is_trend())
    }

    /// Volatility buckets in reporting order.
    pub fn volatility_metrics(&self) -> impl Iterator<Item = (&RegimeKey, &RegimeMetrics)> + '_ {
        self.metrics.iter().filter(|(k, _)| k.is_volatility())
    }

    /// Metrics over every tagged trade, classified or not.
    pub fn overall(&self, config: &RegimeConfig) -> Option<RegimeMetrics> {
        let all: Vec<&TaggedTrade> = self.trades.iter().collect();
        RegimeMetrics::compute(&all, config)
    }

    pub fn unclassified_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_unclassified()).count()
    }
}
