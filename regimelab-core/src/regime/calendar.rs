//! Regime calendar: the date → regime lookup used by trade attribution.

use super::classifier::VolatilityThresholds;
use crate::domain::{RegimeRow, TrendRegime, VolatilityRegime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regime labels keyed by calendar date.
///
/// Built once per classification and never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeCalendar {
    rows: BTreeMap<NaiveDate, RegimeRow>,
    thresholds: Option<VolatilityThresholds>,
}

/// Days per label across a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub total_days: usize,
    pub trend_days: BTreeMap<TrendRegime, usize>,
    pub volatility_days: BTreeMap<VolatilityRegime, usize>,
}

impl RegimeCalendar {
    /// Later rows win if a date repeats.
    pub fn new(rows: Vec<RegimeRow>, thresholds: Option<VolatilityThresholds>) -> Self {
        Self {
            rows: rows.into_iter().map(|r| (r.date, r)).collect(),
            thresholds,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RegimeRow> {
        self.rows.get(&date)
    }

    /// Rows in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &RegimeRow> + '_ {
        self.rows.values()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// ATR cut points used for the volatility labels.
    pub fn thresholds(&self) -> Option<VolatilityThresholds> {
        self.thresholds
    }

    pub fn summary(&self) -> CalendarSummary {
        let mut summary = CalendarSummary {
            total_days: self.rows.len(),
            ..CalendarSummary::default()
        };
        for row in self.rows.values() {
            *summary.trend_days.entry(row.trend).or_default() += 1;
            *summary.volatility_days.entry(row.volatility).or_default() += 1;
        }
        summary
    }
}
