//! Daily indicators: fast/slow EMA of closes and an EMA-smoothed true range.
//!
//! Indicators are pure functions over the daily bars, computed once per
//! `prepare()` and stored row by row in a `DailySeries`.

pub mod atr;
pub mod ewm;

pub use atr::{true_range, Atr};
pub use ewm::{ewm_mean, Ema};

use crate::config::RegimeConfig;
use crate::domain::DailyBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trait for daily indicators.
///
/// Takes the full daily series and returns one value per bar. With
/// minimum-periods-1 smoothing there is no NaN warmup: the first value is
/// defined from the first bar.
///
/// # Look-ahead guard
/// No value at bar t may depend on bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "atr_21").
    fn name(&self) -> &str;

    /// Compute the indicator for the entire series.
    fn compute(&self, bars: &[DailyBar]) -> Vec<f64>;
}

/// One calendar day with its indicator values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIndicatorRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub atr: f64,
}

impl DailyIndicatorRow {
    /// True when every column holds a number.
    pub fn is_complete(&self) -> bool {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.ma_short,
            self.ma_long,
            self.atr,
        ]
        .iter()
        .all(|v| !v.is_nan())
    }
}

/// The prepared daily frame, ascending by date, one row per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    rows: Vec<DailyIndicatorRow>,
}

impl DailySeries {
    /// Compute indicators over daily bars and keep only complete rows.
    ///
    /// # Panics
    ///
    /// Panics if any span in `config` is zero. `RegimeConfig::validate`
    /// rejects such configs, and `MarketAnalysis::new` always validates.
    pub fn from_bars(bars: &[DailyBar], config: &RegimeConfig) -> Self {
        let ma_short = Ema::new(config.short_span).compute(bars);
        let ma_long = Ema::new(config.long_span).compute(bars);
        let atr = Atr::new(config.atr_span).compute(bars);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| DailyIndicatorRow {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                ma_short: ma_short[i],
                ma_long: ma_long[i],
                atr: atr[i],
            })
            .filter(DailyIndicatorRow::is_complete)
            .collect();

        Self { rows }
    }

    /// Wrap rows whose indicators were computed elsewhere.
    ///
    /// Rows are sorted by date and incomplete rows are dropped.
    pub fn from_rows(mut rows: Vec<DailyIndicatorRow>) -> Self {
        rows.retain(DailyIndicatorRow::is_complete);
        rows.sort_by_key(|r| r.date);
        Self { rows }
    }

    pub fn rows(&self) -> &[DailyIndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn atr(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.atr).collect()
    }
}

/// Create synthetic daily bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<DailyBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            DailyBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Daily bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<DailyBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| DailyBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_series_has_one_row_per_bar() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 11.5]);
        let series = DailySeries::from_bars(&bars, &RegimeConfig::default());
        assert_eq!(series.len(), 4);
        assert!(series.rows().iter().all(DailyIndicatorRow::is_complete));
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0, 11.5]);
    }

    #[test]
    fn first_row_indicators_defined_from_first_bar() {
        let bars = make_bars(&[10.0, 11.0]);
        let series = DailySeries::from_bars(&bars, &RegimeConfig::default());
        let first = &series.rows()[0];
        assert_approx(first.ma_short, 10.0, DEFAULT_EPSILON);
        assert_approx(first.ma_long, 10.0, DEFAULT_EPSILON);
        assert_approx(first.atr, first.high - first.low, DEFAULT_EPSILON);
    }

    #[test]
    fn rows_with_nan_are_dropped() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[1].volume = f64::NAN;
        let series = DailySeries::from_bars(&bars, &RegimeConfig::default());
        assert_eq!(series.len(), 2);
        assert!(series.dates().all(|d| d != bars[1].date));
    }

    #[test]
    #[should_panic(expected = "span must be >= 1")]
    fn zero_span_config_panics() {
        let config = RegimeConfig {
            short_span: 0,
            ..RegimeConfig::default()
        };
        assert!(config.validate().is_err());
        DailySeries::from_bars(&make_bars(&[1.0, 2.0]), &config);
    }

    #[test]
    fn empty_bars_empty_series() {
        let series = DailySeries::from_bars(&[], &RegimeConfig::default());
        assert!(series.is_empty());
    }
}
