//! Classification and statistics parameters.
//!
//! Every threshold the engine applies lives here with a named default, so a
//! caller can override any of them from code or from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Fast EMA span of closes (trading days).
pub const DEFAULT_SHORT_SPAN: usize = 20;
/// Slow EMA span of closes (trading days).
pub const DEFAULT_LONG_SPAN: usize = 200;
/// EMA span of the true range.
pub const DEFAULT_ATR_SPAN: usize = 21;
/// ATR at or below this quantile is low volatility.
pub const DEFAULT_LOW_VOL_QUANTILE: f64 = 0.33;
/// ATR at or above this quantile is high volatility.
pub const DEFAULT_HIGH_VOL_QUANTILE: f64 = 0.67;
/// Minimum trades in a bucket before a Sharpe ratio is reported.
pub const DEFAULT_MIN_SHARPE_TRADES: usize = 20;
/// Minimum distinct entry dates in a bucket before a Sharpe ratio is reported.
pub const DEFAULT_MIN_SHARPE_DAYS: usize = 20;
/// Capital used to turn absolute PnL into percentage returns.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
/// Below this many trades a reported Sharpe is flagged as limited data.
pub const DEFAULT_LIMITED_DATA_TRADES: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Regime engine configuration.
///
/// Missing TOML fields fall back to the `DEFAULT_*` constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegimeConfig {
    pub short_span: usize,
    pub long_span: usize,
    pub atr_span: usize,
    pub low_vol_quantile: f64,
    pub high_vol_quantile: f64,
    pub min_sharpe_trades: usize,
    pub min_sharpe_days: usize,
    pub initial_capital: f64,
    pub limited_data_trades: usize,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            short_span: DEFAULT_SHORT_SPAN,
            long_span: DEFAULT_LONG_SPAN,
            atr_span: DEFAULT_ATR_SPAN,
            low_vol_quantile: DEFAULT_LOW_VOL_QUANTILE,
            high_vol_quantile: DEFAULT_HIGH_VOL_QUANTILE,
            min_sharpe_trades: DEFAULT_MIN_SHARPE_TRADES,
            min_sharpe_days: DEFAULT_MIN_SHARPE_DAYS,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            limited_data_trades: DEFAULT_LIMITED_DATA_TRADES,
        }
    }
}

impl RegimeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn with_initial_capital(mut self, initial_capital: f64) -> Self {
        self.initial_capital = initial_capital;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, span) in [
            ("short_span", self.short_span),
            ("long_span", self.long_span),
            ("atr_span", self.atr_span),
        ] {
            if span == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
            }
        }
        for (name, q) in [
            ("low_vol_quantile", self.low_vol_quantile),
            ("high_vol_quantile", self.high_vol_quantile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {q}"
                )));
            }
        }
        if self.low_vol_quantile >= self.high_vol_quantile {
            return Err(ConfigError::Invalid(format!(
                "low_vol_quantile ({}) must be below high_vol_quantile ({})",
                self.low_vol_quantile, self.high_vol_quantile
            )));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = RegimeConfig::default();
        assert_eq!(config.short_span, 20);
        assert_eq!(config.long_span, 200);
        assert_eq!(config.atr_span, 21);
        assert_eq!(config.low_vol_quantile, 0.33);
        assert_eq!(config.high_vol_quantile, 0.67);
        assert_eq!(config.min_sharpe_trades, 20);
        assert_eq!(config.min_sharpe_days, 20);
        assert_eq!(config.initial_capital, 100_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RegimeConfig::from_toml("long_span = 100\ninitial_capital = 50000.0\n").unwrap();
        assert_eq!(config.long_span, 100);
        assert_eq!(config.initial_capital, 50_000.0);
        assert_eq!(config.short_span, DEFAULT_SHORT_SPAN);
        assert_eq!(config.atr_span, DEFAULT_ATR_SPAN);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RegimeConfig::from_toml("").unwrap(), RegimeConfig::default());
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = RegimeConfig::from_toml("medium_span = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_span_rejected() {
        let err = RegimeConfig::from_toml("atr_span = 0").unwrap_err();
        assert!(err.to_string().contains("atr_span"));
    }

    #[test]
    fn inverted_quantiles_rejected() {
        let err = RegimeConfig::from_toml("low_vol_quantile = 0.8\nhigh_vol_quantile = 0.2")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn out_of_range_quantile_rejected() {
        assert!(RegimeConfig::from_toml("high_vol_quantile = 1.5").is_err());
    }

    #[test]
    fn non_positive_capital_rejected() {
        let config = RegimeConfig::default().with_initial_capital(0.0);
        assert!(config.validate().is_err());
        let config = RegimeConfig::default().with_initial_capital(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regime.toml");
        std::fs::write(&path, "short_span = 10\n").unwrap();
        let config = RegimeConfig::from_file(&path).unwrap();
        assert_eq!(config.short_span, 10);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = RegimeConfig::from_file(Path::new("/nonexistent/regime.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
