//! Regime-attributed trade analysis.

pub mod attribution;
pub mod market;
pub mod report;
pub mod sharpe;
pub mod stats;

pub use attribution::{attribute_trades, return_pct};
pub use market::MarketAnalysis;
pub use report::RegimeReport;
pub use sharpe::{estimate_sharpe, regime_sharpe, InsufficientData};
pub use stats::{regime_metrics, RegimeMetrics};

use crate::config::ConfigError;
use thiserror::Error;

/// Misuse of the two-phase `MarketAnalysis` contract.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("daily data not prepared; call prepare() first")]
    NotPrepared,

    #[error("regimes not classified; call classify() first")]
    NotClassified,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
