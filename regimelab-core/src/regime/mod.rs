//! Regime classification: trend from moving-average relationships,
//! volatility from whole-history ATR quantiles.

pub mod calendar;
pub mod classifier;

pub use calendar::{CalendarSummary, RegimeCalendar};
pub use classifier::{classify_regimes, classify_trends, quantile, trend_label, VolatilityThresholds};
