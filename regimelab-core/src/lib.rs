//! RegimeLab Core: market regime classification and regime-attributed
//! trade performance.
//!
//! Pipeline:
//! - Daily aggregation of the price series (`data`)
//! - Fast/slow EMA and EMA-smoothed true range (`indicators`)
//! - Trend and volatility labels per day, as a date-keyed calendar (`regime`)
//! - Trade attribution, per-regime statistics and a gated Sharpe estimator (`analysis`)
//!
//! `analysis::MarketAnalysis` drives the stages with an explicit
//! prepare → classify → analyze contract.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod regime;

pub use analysis::{MarketAnalysis, RegimeMetrics, RegimeReport};
pub use config::RegimeConfig;
pub use domain::{
    DailyBar, PriceSample, PriceSeries, RegimeKey, RegimeRow, TaggedTrade, Trade, TrendRegime,
    VolatilityRegime,
};
pub use regime::RegimeCalendar;
