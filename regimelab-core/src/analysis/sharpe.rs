//! Regime Sharpe estimator.
//!
//! Trade returns are summed per entry date into a daily return series, then
//! annualized by the number of distinct trading days the regime actually
//! covered rather than a fixed 252:
//!
//! ```text
//! sharpe = mean(r) * days / (std(r) * sqrt(days))
//! ```
//!
//! Any failed precondition yields no ratio instead of a sentinel value.

use crate::domain::TaggedTrade;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Standard deviations below this are treated as zero variance.
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-15;

/// Why no Sharpe ratio was produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsufficientData {
    #[error("{trades} trades, need at least {min}")]
    TooFewTrades { trades: usize, min: usize },

    #[error("{days} trading days, need at least {min}")]
    TooFewDays { days: usize, min: usize },

    #[error("daily returns have zero variance")]
    ZeroVariance,
}

/// Sum of `return_pct` per entry date.
pub fn daily_returns<'a, I>(trades: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a TaggedTrade>,
{
    let mut daily = BTreeMap::new();
    for trade in trades {
        *daily.entry(trade.entry_date()).or_insert(0.0) += trade.return_pct;
    }
    daily
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 divisor). Zero for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Sharpe estimate with the reason it was withheld.
pub fn estimate_sharpe(
    trades: &[&TaggedTrade],
    min_trades: usize,
    min_days: usize,
) -> Result<f64, InsufficientData> {
    if trades.len() < min_trades {
        return Err(InsufficientData::TooFewTrades {
            trades: trades.len(),
            min: min_trades,
        });
    }

    let daily = daily_returns(trades.iter().copied());
    let returns: Vec<f64> = daily.values().copied().collect();
    if returns.len() < min_days {
        return Err(InsufficientData::TooFewDays {
            days: returns.len(),
            min: min_days,
        });
    }
    let std = sample_std(&returns);
    if std < ZERO_VARIANCE_EPSILON {
        return Err(InsufficientData::ZeroVariance);
    }

    let trading_days = daily.len();
    if trading_days < min_days {
        return Err(InsufficientData::TooFewDays {
            days: trading_days,
            min: min_days,
        });
    }

    let days = trading_days as f64;
    let annualized_return = mean(&returns) * days;
    let annualized_vol = std * days.sqrt();
    Ok(annualized_return / annualized_vol)
}

/// Sharpe ratio for a regime subset, `None` when data is insufficient.
pub fn regime_sharpe(trades: &[&TaggedTrade], min_trades: usize, min_days: usize) -> Option<f64> {
    estimate_sharpe(trades, min_trades, min_days).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::attribution::return_pct;
    use crate::domain::{Trade, TrendRegime, VolatilityRegime};
    use chrono::NaiveDateTime;

    fn at(day: i64, hour: u32) -> NaiveDateTime {
        (NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(day))
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn tagged(day: i64, hour: u32, pnl: f64) -> TaggedTrade {
        TaggedTrade {
            trade: Trade::new(at(day, hour), pnl),
            trend: TrendRegime::Uptrend,
            volatility: VolatilityRegime::Medium,
            return_pct: return_pct(pnl, 100_000.0),
        }
    }

    fn refs(trades: &[TaggedTrade]) -> Vec<&TaggedTrade> {
        trades.iter().collect()
    }

    #[test]
    fn nineteen_trades_is_insufficient() {
        let trades: Vec<_> = (0..19).map(|d| tagged(d, 10, (d as f64) * 10.0 - 50.0)).collect();
        assert_eq!(
            estimate_sharpe(&refs(&trades), 20, 20),
            Err(InsufficientData::TooFewTrades { trades: 19, min: 20 })
        );
        assert_eq!(regime_sharpe(&refs(&trades), 20, 20), None);
    }

    #[test]
    fn enough_trades_but_too_few_days() {
        // 30 trades packed into 10 dates
        let trades: Vec<_> = (0..30).map(|i| tagged(i / 3, (i % 3) as u32, i as f64)).collect();
        assert_eq!(
            estimate_sharpe(&refs(&trades), 20, 20),
            Err(InsufficientData::TooFewDays { days: 10, min: 20 })
        );
    }

    #[test]
    fn constant_daily_returns_have_no_ratio() {
        let trades: Vec<_> = (0..25).map(|d| tagged(d, 10, 100.0)).collect();
        assert_eq!(
            estimate_sharpe(&refs(&trades), 20, 20),
            Err(InsufficientData::ZeroVariance)
        );
    }

    #[test]
    fn ratio_matches_closed_form() {
        let pnls: Vec<f64> = (0..24).map(|i| if i % 3 == 0 { -150.0 } else { 200.0 + i as f64 }).collect();
        let trades: Vec<_> = pnls.iter().enumerate().map(|(d, &p)| tagged(d as i64, 10, p)).collect();

        let returns: Vec<f64> = pnls.iter().map(|p| p / 100_000.0 * 100.0).collect();
        let days = returns.len() as f64;
        let expected = mean(&returns) * days / (sample_std(&returns) * days.sqrt());

        let sharpe = regime_sharpe(&refs(&trades), 20, 20).unwrap();
        assert!((sharpe - expected).abs() < 1e-9, "sharpe={sharpe} expected={expected}");
    }

    #[test]
    fn same_day_trades_are_summed_before_ratio() {
        let mut trades: Vec<_> = (0..20).map(|d| tagged(d, 10, 100.0 + d as f64 * 5.0)).collect();
        trades.push(tagged(0, 15, 40.0));
        let daily = daily_returns(&trades);
        assert_eq!(daily.len(), 20);
        let first = daily.values().next().copied().unwrap();
        assert!((first - return_pct(140.0, 100_000.0)).abs() < 1e-12);
        assert!(regime_sharpe(&refs(&trades), 20, 20).is_some());
    }

    #[test]
    fn thresholds_are_configurable() {
        let trades: Vec<_> = (0..5).map(|d| tagged(d, 10, 10.0 * (d as f64 + 1.0))).collect();
        assert!(regime_sharpe(&refs(&trades), 20, 20).is_none());
        assert!(regime_sharpe(&refs(&trades), 5, 5).is_some());
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0]);
        assert!((std - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std(&[3.0]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }
}
