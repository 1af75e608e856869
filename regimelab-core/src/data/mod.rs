//! Daily aggregation of the raw price series.

pub mod aggregate;

pub use aggregate::{aggregate_daily, daily_bars};
