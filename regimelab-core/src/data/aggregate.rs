//! Collapse intraday samples to one OHLCV bar per date.
//!
//! Per date: open = first non-missing open, high = max high, low = min low,
//! close = last non-missing close, volume = sum of volumes. Missing OHLC is
//! forward-filled from the previous date, then high and low are widened to
//! cover the day's open and close; dates that still have gaps (leading rows
//! with nothing to inherit) are dropped.

use crate::domain::{DailyBar, PriceSample, PriceSeries};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Running per-date accumulator. `None` means no valid observation yet.
#[derive(Debug, Default)]
struct DayAccumulator {
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: f64,
}

impl DayAccumulator {
    fn push(&mut self, sample: &PriceSample) {
        if self.open.is_none() && !sample.open.is_nan() {
            self.open = Some(sample.open);
        }
        if !sample.high.is_nan() {
            self.high = Some(self.high.map_or(sample.high, |h| h.max(sample.high)));
        }
        if !sample.low.is_nan() {
            self.low = Some(self.low.map_or(sample.low, |l| l.min(sample.low)));
        }
        if !sample.close.is_nan() {
            self.close = Some(sample.close);
        }
        if !sample.volume.is_nan() {
            self.volume += sample.volume;
        }
    }
}

/// Aggregate intraday samples into daily bars, sorted by date.
pub fn aggregate_daily(samples: &[PriceSample]) -> Vec<DailyBar> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for sample in samples {
        days.entry(sample.date).or_default().push(sample);
    }

    let mut bars = Vec::with_capacity(days.len());
    let mut prev: Option<DailyBar> = None;

    for (date, day) in days {
        let carry = |value: Option<f64>, pick: fn(&DailyBar) -> f64| {
            value.or_else(|| prev.as_ref().map(pick))
        };
        let open = carry(day.open, |b| b.open);
        let high = carry(day.high, |b| b.high);
        let low = carry(day.low, |b| b.low);
        let close = carry(day.close, |b| b.close);

        if let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) {
            // A carried high or low can sit inside today's observed prices.
            let bar = DailyBar {
                date,
                open,
                high: high.max(low).max(open).max(close),
                low: low.min(open).min(close),
                close,
                volume: day.volume,
            };
            prev = Some(bar.clone());
            bars.push(bar);
        }
    }

    debug!(samples = samples.len(), days = bars.len(), "aggregated intraday samples");
    bars
}

/// Daily bars for any price series layout.
///
/// Intraday input is aggregated; daily input passes through with incomplete
/// rows removed.
pub fn daily_bars(series: &PriceSeries) -> Vec<DailyBar> {
    match series {
        PriceSeries::Intraday(samples) => aggregate_daily(samples),
        PriceSeries::Daily(bars) => {
            let kept: Vec<DailyBar> = bars.iter().filter(|b| !b.is_void()).cloned().collect();
            if kept.len() < bars.len() {
                debug!(dropped = bars.len() - kept.len(), "dropped incomplete daily rows");
            }
            kept
        }
    }
}
