//! Trades consumed by the attribution join.

use super::regime::{TrendRegime, VolatilityRegime};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A closed trade from the strategy's trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub pnl: f64,
}

impl Trade {
    pub fn new(entry_time: NaiveDateTime, pnl: f64) -> Self {
        Self { entry_time, pnl }
    }

    /// Calendar date used to look up the regime.
    pub fn entry_date(&self) -> NaiveDate {
        self.entry_time.date()
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}

/// A trade labeled with the regime of its entry date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedTrade {
    #[serde(flatten)]
    pub trade: Trade,
    pub trend: TrendRegime,
    pub volatility: VolatilityRegime,
    /// `pnl / initial_capital * 100`.
    pub return_pct: f64,
}

impl TaggedTrade {
    pub fn entry_date(&self) -> NaiveDate {
        self.trade.entry_date()
    }

    pub fn pnl(&self) -> f64 {
        self.trade.pnl
    }

    pub fn is_winner(&self) -> bool {
        self.trade.is_winner()
    }

    /// True when the entry date had no regime row.
    pub fn is_unclassified(&self) -> bool {
        !self.trend.is_classified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn entry_date_drops_time_of_day() {
        let trade = Trade::new(at(2024, 5, 6, 22), 10.0);
        assert_eq!(trade.entry_date(), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    }

    #[test]
    fn zero_pnl_is_not_a_winner() {
        assert!(Trade::new(at(2024, 5, 6, 9), 0.01).is_winner());
        assert!(!Trade::new(at(2024, 5, 6, 9), 0.0).is_winner());
        assert!(!Trade::new(at(2024, 5, 6, 9), -5.0).is_winner());
    }

    #[test]
    fn tagged_trade_json_is_flat() {
        let tagged = TaggedTrade {
            trade: Trade::new(at(2024, 5, 6, 9), 250.0),
            trend: TrendRegime::Uptrend,
            volatility: VolatilityRegime::Low,
            return_pct: 0.25,
        };
        let value = serde_json::to_value(&tagged).unwrap();
        assert_eq!(value["pnl"], 250.0);
        assert_eq!(value["trend"], "uptrend");
        assert_eq!(value["volatility"], "low");
        assert!(!tagged.is_unclassified());
    }
}
