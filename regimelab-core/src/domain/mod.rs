//! Domain types for RegimeLab

pub mod bar;
pub mod regime;
pub mod trade;

pub use bar::{DailyBar, PriceSample, PriceSeries};
pub use regime::{RegimeKey, RegimeRow, TrendRegime, VolatilityRegime};
pub use trade::{TaggedTrade, Trade};
