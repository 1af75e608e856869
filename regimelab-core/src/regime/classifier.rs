//! Day-level regime classifier.
//!
//! Trend, per day:
//! - `above_long`   = close > ma_long
//! - `rising_short` = ma_short > previous ma_short (false on the first day)
//!
//! both → uptrend, neither → downtrend, exactly one → sideways. The sideways
//! label does not record which side of the long average price is on.
//!
//! Volatility: ATR quantiles are computed once over the whole history, so an
//! early day is bucketed with knowledge of later ATR values. This is a
//! historical labeling tool, not an online classifier.

use super::calendar::RegimeCalendar;
use crate::config::RegimeConfig;
use crate::domain::{RegimeRow, TrendRegime, VolatilityRegime};
use crate::indicators::{DailyIndicatorRow, DailySeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Trend label from the two moving-average conditions.
pub fn trend_label(above_long: bool, rising_short: bool) -> TrendRegime {
    match (above_long, rising_short) {
        (true, true) => TrendRegime::Uptrend,
        (false, false) => TrendRegime::Downtrend,
        _ => TrendRegime::Sideways,
    }
}

/// Trend label for every row. Never yields `Unclassified`.
pub fn classify_trends(rows: &[DailyIndicatorRow]) -> Vec<TrendRegime> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let above_long = row.close > row.ma_long;
            let rising_short = i
                .checked_sub(1)
                .is_some_and(|p| row.ma_short > rows[p].ma_short);
            trend_label(above_long, rising_short)
        })
        .collect()
}

/// Quantile with linear interpolation between order statistics.
///
/// Returns `None` for an empty slice or a slice containing NaN.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// ATR cut points for the volatility buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityThresholds {
    pub low: f64,
    pub high: f64,
}

impl VolatilityThresholds {
    /// Batch quantiles over the full ATR history.
    pub fn from_atr(atr: &[f64], config: &RegimeConfig) -> Option<Self> {
        Some(Self {
            low: quantile(atr, config.low_vol_quantile)?,
            high: quantile(atr, config.high_vol_quantile)?,
        })
    }

    /// Bucket one ATR value.
    ///
    /// The low test runs first, then high, else medium. When the two
    /// thresholds coincide a value equal to both is therefore `Low`.
    pub fn classify(&self, atr: f64) -> VolatilityRegime {
        if atr <= self.low {
            VolatilityRegime::Low
        } else if atr >= self.high {
            VolatilityRegime::High
        } else {
            VolatilityRegime::Medium
        }
    }
}

/// Build a fresh regime calendar from the prepared daily series.
pub fn classify_regimes(series: &DailySeries, config: &RegimeConfig) -> RegimeCalendar {
    let rows = series.rows();
    let Some(thresholds) = VolatilityThresholds::from_atr(&series.atr(), config) else {
        debug!("no ATR history, regime calendar is empty");
        return RegimeCalendar::empty();
    };

    let trends = classify_trends(rows);
    let regimes: Vec<RegimeRow> = rows
        .iter()
        .zip(trends)
        .map(|(row, trend)| RegimeRow {
            date: row.date,
            trend,
            volatility: thresholds.classify(row.atr),
            atr: row.atr,
        })
        .collect();

    let calendar = RegimeCalendar::new(regimes, Some(thresholds));
    info!(
        days = calendar.len(),
        atr_low = thresholds.low,
        atr_high = thresholds.high,
        "classified market regimes"
    );
    calendar
}
