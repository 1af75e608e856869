//! `MarketAnalysis`: the two-phase driver of the regime pipeline.
//!
//! 1. `new` borrows the price series and validates the config.
//! 2. `prepare` aggregates to daily bars and computes indicators.
//! 3. `classify` builds the regime calendar from the prepared frame.
//! 4. `analyze_performance` attributes trades and aggregates statistics.
//!
//! Steps 2 and 3 are the only mutations. Once both have run, the instance is
//! read-only and may be shared across threads for step 4.

use super::attribution::attribute_trades;
use super::report::RegimeReport;
use super::stats::regime_metrics;
use super::AnalysisError;
use crate::config::RegimeConfig;
use crate::data::daily_bars;
use crate::domain::{PriceSeries, Trade};
use crate::indicators::DailySeries;
use crate::regime::{classify_regimes, RegimeCalendar};
use tracing::{debug, info};

#[derive(Debug)]
pub struct MarketAnalysis<'a> {
    series: &'a PriceSeries,
    config: RegimeConfig,
    daily: Option<DailySeries>,
    regimes: Option<RegimeCalendar>,
}

impl<'a> MarketAnalysis<'a> {
    pub fn new(series: &'a PriceSeries, config: RegimeConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            series,
            config,
            daily: None,
            regimes: None,
        })
    }

    pub fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Aggregate and compute indicators; replaces any earlier result.
    pub fn prepare(&mut self) -> &DailySeries {
        let bars = daily_bars(self.series);
        let daily = DailySeries::from_bars(&bars, &self.config);
        debug!(
            raw_rows = self.series.len(),
            intraday = self.series.is_intraday(),
            days = daily.len(),
            "prepared daily series"
        );
        // A new frame invalidates any calendar built from the old one.
        self.regimes = None;
        self.daily.insert(daily)
    }

    /// Classify every prepared day. Recomputed from scratch on each call.
    pub fn classify(&mut self) -> Result<&RegimeCalendar, AnalysisError> {
        let daily = self.daily.as_ref().ok_or(AnalysisError::NotPrepared)?;
        let calendar = classify_regimes(daily, &self.config);
        Ok(self.regimes.insert(calendar))
    }

    pub fn daily(&self) -> Option<&DailySeries> {
        self.daily.as_ref()
    }

    pub fn regimes(&self) -> Option<&RegimeCalendar> {
        self.regimes.as_ref()
    }

    /// Attribute trades to regimes and compute per-bucket metrics.
    pub fn analyze_performance(&self, trades: &[Trade]) -> Result<RegimeReport, AnalysisError> {
        let calendar = self.regimes.as_ref().ok_or(AnalysisError::NotClassified)?;
        let tagged = attribute_trades(trades, calendar, self.config.initial_capital);
        let metrics = regime_metrics(&tagged, &self.config);
        info!(
            trades = tagged.len(),
            buckets = metrics.len(),
            "analyzed regime performance"
        );
        Ok(RegimeReport {
            metrics,
            trades: tagged,
        })
    }

    /// Prepare, classify and analyze in one call.
    pub fn run(
        series: &'a PriceSeries,
        trades: &[Trade],
        config: RegimeConfig,
    ) -> Result<(RegimeCalendar, RegimeReport), AnalysisError> {
        let mut analysis = Self::new(series, config)?;
        analysis.prepare();
        let calendar = analysis.classify()?.clone();
        let report = analysis.analyze_performance(trades)?;
        Ok((calendar, report))
    }
}
