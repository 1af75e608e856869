//! Price bars: the raw market data consumed by the daily aggregator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single intraday price/volume observation.
///
/// `date` is the aggregation key. It defaults to the calendar date of
/// `timestamp` but may be set explicitly (e.g. a session date that differs
/// from the wall-clock date). Missing values are NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceSample {
    /// Build a sample keyed by the calendar date of its timestamp.
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// OHLCV bar for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyBar {
    /// Returns true if any OHLCV field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Complete bar with a non-inverted range.
    pub fn is_sane(&self) -> bool {
        !self.is_void() && self.high >= self.low
    }
}

/// Price history handed to the engine.
///
/// `Intraday` samples carry a date key and are collapsed to one bar per day.
/// `Daily` bars are assumed to be one per date already and skip aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "layout", content = "rows", rename_all = "snake_case")]
pub enum PriceSeries {
    Intraday(Vec<PriceSample>),
    Daily(Vec<DailyBar>),
}

impl PriceSeries {
    /// Number of raw rows (samples or bars) before aggregation.
    pub fn len(&self) -> usize {
        match self {
            Self::Intraday(samples) => samples.len(),
            Self::Daily(bars) => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, Self::Intraday(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_inverted_range() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn sample_date_follows_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let sample = PriceSample::new(ts, 1.0, 2.0, 0.5, 1.5, 10.0);
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn series_len_covers_both_layouts() {
        assert!(PriceSeries::Daily(vec![]).is_empty());
        let series = PriceSeries::Daily(vec![sample_bar(), sample_bar()]);
        assert_eq!(series.len(), 2);
        assert!(!series.is_intraday());
    }
}
