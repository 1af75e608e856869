//! Run fingerprinting: deterministic identifiers for an analysis run.
//!
//! - `ConfigHash`: BLAKE3 of the canonical JSON of a `RegimeConfig`.
//! - `DatasetHash`: BLAKE3 over the price series and trade log bytes.
//!
//! Two runs with equal hashes classified the same data with the same
//! parameters and must produce identical reports.

use crate::config::RegimeConfig;
use crate::domain::{PriceSeries, Trade};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RegimeConfig {
    pub fn config_hash(&self) -> ConfigHash {
        // Struct fields serialize in declaration order, so the JSON is canonical.
        let json = serde_json::to_string(self).unwrap_or_default();
        ConfigHash(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

/// Content hash of both analysis inputs.
pub fn dataset_hash(series: &PriceSeries, trades: &[Trade]) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();

    match series {
        PriceSeries::Intraday(samples) => {
            hasher.update(b"intraday");
            for s in samples {
                hasher.update(&s.timestamp.and_utc().timestamp().to_le_bytes());
                hasher.update(s.date.to_string().as_bytes());
                for v in [s.open, s.high, s.low, s.close, s.volume] {
                    hasher.update(&v.to_le_bytes());
                }
            }
        }
        PriceSeries::Daily(bars) => {
            hasher.update(b"daily");
            for b in bars {
                hasher.update(b.date.to_string().as_bytes());
                for v in [b.open, b.high, b.low, b.close, b.volume] {
                    hasher.update(&v.to_le_bytes());
                }
            }
        }
    }

    hasher.update(b"trades");
    for t in trades {
        hasher.update(&t.entry_time.and_utc().timestamp().to_le_bytes());
        hasher.update(&t.pnl.to_le_bytes());
    }

    DatasetHash(hasher.finalize().to_hex().to_string())
}
