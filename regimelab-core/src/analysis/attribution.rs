//! Trade attribution: left join of trades onto the regime calendar.
//!
//! Every trade is kept exactly once, in input order. A trade whose entry date
//! has no calendar row (before the first classified day, or a non-trading day)
//! is labeled unclassified for both trend and volatility.

use crate::domain::{TaggedTrade, Trade, TrendRegime, VolatilityRegime};
use crate::regime::RegimeCalendar;
use tracing::{debug, warn};

/// PnL as a percentage of starting capital.
pub fn return_pct(pnl: f64, initial_capital: f64) -> f64 {
    pnl / initial_capital * 100.0
}

pub fn attribute_trades(
    trades: &[Trade],
    calendar: &RegimeCalendar,
    initial_capital: f64,
) -> Vec<TaggedTrade> {
    let tagged: Vec<TaggedTrade> = trades
        .iter()
        .map(|trade| {
            let (trend, volatility) = match calendar.get(trade.entry_date()) {
                Some(row) => (row.trend, row.volatility),
                None => (TrendRegime::Unclassified, VolatilityRegime::Unclassified),
            };
            TaggedTrade {
                trade: trade.clone(),
                trend,
                volatility,
                return_pct: return_pct(trade.pnl, initial_capital),
            }
        })
        .collect();

    let unclassified = tagged.iter().filter(|t| t.is_unclassified()).count();
    if unclassified > 0 {
        warn!(
            unclassified,
            total = tagged.len(),
            first_regime_date = ?calendar.first_date(),
            "trades with no regime row for their entry date"
        );
    }
    debug!(trades = tagged.len(), "attributed trades to regimes");
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegimeRow;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32) -> NaiveDateTime {
        d.and_hms_opt(h, 15, 0).unwrap()
    }

    fn calendar() -> RegimeCalendar {
        let row = |d, trend, volatility| RegimeRow {
            date: d,
            trend,
            volatility,
            atr: 1.0,
        };
        RegimeCalendar::new(
            vec![
                row(date(2020, 6, 1), TrendRegime::Uptrend, VolatilityRegime::High),
                row(date(2020, 6, 2), TrendRegime::Downtrend, VolatilityRegime::Low),
            ],
            None,
        )
    }

    #[test]
    fn matched_trades_copy_labels() {
        let trades = vec![Trade::new(at(date(2020, 6, 2), 14), 50.0)];
        let tagged = attribute_trades(&trades, &calendar(), 100_000.0);
        assert_eq!(tagged[0].trend, TrendRegime::Downtrend);
        assert_eq!(tagged[0].volatility, VolatilityRegime::Low);
        assert!((tagged[0].return_pct - 0.05).abs() < 1e-12);
    }

    #[test]
    fn trade_before_calendar_is_unclassified() {
        let trades = vec![Trade::new(at(date(2020, 1, 1), 10), -20.0)];
        let tagged = attribute_trades(&trades, &calendar(), 100_000.0);
        assert_eq!(tagged[0].trend, TrendRegime::Unclassified);
        assert_eq!(tagged[0].volatility, VolatilityRegime::Unclassified);
        assert!(tagged[0].is_unclassified());
    }

    #[test]
    fn non_trading_day_is_unclassified() {
        let trades = vec![Trade::new(at(date(2020, 6, 6), 10), 5.0)];
        let tagged = attribute_trades(&trades, &calendar(), 100_000.0);
        assert!(tagged[0].is_unclassified());
    }

    #[test]
    fn many_trades_per_day_no_drop_no_duplicate() {
        let d = date(2020, 6, 1);
        let trades: Vec<Trade> = (0..5).map(|h| Trade::new(at(d, h), h as f64)).collect();
        let tagged = attribute_trades(&trades, &calendar(), 100_000.0);
        assert_eq!(tagged.len(), 5);
        for (t, original) in tagged.iter().zip(&trades) {
            assert_eq!(&t.trade, original);
            assert_eq!(t.trend, TrendRegime::Uptrend);
        }
    }

    #[test]
    fn empty_inputs() {
        assert!(attribute_trades(&[], &calendar(), 100_000.0).is_empty());
        let trades = vec![Trade::new(at(date(2020, 6, 1), 9), 1.0)];
        let tagged = attribute_trades(&trades, &RegimeCalendar::empty(), 100_000.0);
        assert_eq!(tagged.len(), 1);
        assert!(tagged[0].is_unclassified());
    }
}
