//! Regime labels and the per-day regime row.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Trend direction of a day, or of a trade's entry date.
///
/// Classified days are always `Uptrend`, `Downtrend` or `Sideways`.
/// `Unclassified` is reserved for trades whose entry date has no regime row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendRegime {
    Uptrend,
    Downtrend,
    Sideways,
    Unclassified,
}

impl TrendRegime {
    /// Every trend label, in reporting order.
    pub const ALL: [TrendRegime; 4] = [
        TrendRegime::Uptrend,
        TrendRegime::Downtrend,
        TrendRegime::Sideways,
        TrendRegime::Unclassified,
    ];

    /// Labels a classified day can take.
    pub const CLASSIFIED: [TrendRegime; 3] = [
        TrendRegime::Uptrend,
        TrendRegime::Downtrend,
        TrendRegime::Sideways,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uptrend => "uptrend",
            Self::Downtrend => "downtrend",
            Self::Sideways => "sideways",
            Self::Unclassified => "unclassified",
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl fmt::Display for TrendRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ATR-quantile volatility bucket.
///
/// `Unclassified` is the attribution sentinel; classified days only carry
/// `Low`, `Medium` or `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRegime {
    High,
    Medium,
    Low,
    Unclassified,
}

impl VolatilityRegime {
    /// Labels that form volatility buckets, in reporting order.
    pub const CLASSIFIED: [VolatilityRegime; 3] = [
        VolatilityRegime::High,
        VolatilityRegime::Medium,
        VolatilityRegime::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unclassified => "unclassified",
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite bucket key: regime kind plus label.
///
/// Renders as `<trend>_regime` or `<volatility>_vol`, and (de)serializes as
/// that string so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegimeKey {
    Trend(TrendRegime),
    Volatility(VolatilityRegime),
}

impl RegimeKey {
    pub fn is_trend(&self) -> bool {
        matches!(self, Self::Trend(_))
    }

    pub fn is_volatility(&self) -> bool {
        matches!(self, Self::Volatility(_))
    }

    /// Bare label without the kind suffix (`uptrend`, `high`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trend(t) => t.as_str(),
            Self::Volatility(v) => v.as_str(),
        }
    }
}

impl fmt::Display for RegimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trend(t) => write!(f, "{t}_regime"),
            Self::Volatility(v) => write!(f, "{v}_vol"),
        }
    }
}

impl FromStr for RegimeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(label) = s.strip_suffix("_regime") {
            TrendRegime::ALL
                .into_iter()
                .find(|t| t.as_str() == label)
                .map(RegimeKey::Trend)
                .ok_or_else(|| format!("unknown trend regime '{label}'"))
        } else if let Some(label) = s.strip_suffix("_vol") {
            VolatilityRegime::CLASSIFIED
                .into_iter()
                .chain([VolatilityRegime::Unclassified])
                .find(|v| v.as_str() == label)
                .map(RegimeKey::Volatility)
                .ok_or_else(|| format!("unknown volatility regime '{label}'"))
        } else {
            Err(format!("invalid regime key '{s}'"))
        }
    }
}

impl Serialize for RegimeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegimeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Regime labels for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeRow {
    pub date: NaiveDate,
    pub trend: TrendRegime,
    pub volatility: VolatilityRegime,
    pub atr: f64,
}
