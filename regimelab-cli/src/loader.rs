//! CSV loading for price series and trade logs.
//!
//! Price files carry `open,high,low,close,volume` plus either a `timestamp`
//! column (intraday samples, aggregated to days by the engine) or a `date`
//! column (already daily). With both, `date` is the session key of each
//! intraday sample. Trade files need `entry_time` and `pnl`; any other
//! columns are ignored. Header names are matched case-insensitively.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use regimelab_core::{DailyBar, PriceSample, PriceSeries, Trade};
use thiserror::Error;
use tracing::debug;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: unrecognized timestamp '{value}'")]
    BadTimestamp { line: u64, value: String },

    #[error("line {line}: column '{column}' is not a number: '{value}'")]
    BadNumber {
        line: u64,
        column: String,
        value: String,
    },
}

/// Parse a timestamp in any of the accepted layouts. A bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ─── Column lookup ──────────────────────────────────────────────────

struct Columns<'h> {
    headers: &'h StringRecord,
}

impl<'h> Columns<'h> {
    fn find(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.find(name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

/// Empty cells are missing values and become NaN.
fn optional_number(record: &StringRecord, idx: usize, column: &str) -> Result<f64, LoadError> {
    let raw = field(record, idx);
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|_| LoadError::BadNumber {
        line: line_of(record),
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn required_number(record: &StringRecord, idx: usize, column: &str) -> Result<f64, LoadError> {
    let raw = field(record, idx);
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::BadNumber {
            line: line_of(record),
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn timestamp_at(record: &StringRecord, idx: usize) -> Result<NaiveDateTime, LoadError> {
    let raw = field(record, idx);
    parse_timestamp(raw).ok_or_else(|| LoadError::BadTimestamp {
        line: line_of(record),
        value: raw.to_string(),
    })
}

fn open_file(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Prices ─────────────────────────────────────────────────────────

const OHLCV: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Read a price CSV from any reader.
pub fn read_prices<R: Read>(reader: R) -> Result<PriceSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns { headers: &headers };

    let mut idx = [0usize; 5];
    for (slot, name) in idx.iter_mut().zip(OHLCV) {
        *slot = cols.require(name)?;
    }

    let parse_ohlcv = |record: &StringRecord| -> Result<[f64; 5], LoadError> {
        let mut values = [0.0; 5];
        for ((value, &i), name) in values.iter_mut().zip(&idx).zip(OHLCV) {
            *value = optional_number(record, i, name)?;
        }
        Ok(values)
    };

    let date_idx = cols.find("date");

    if let Some(ts_idx) = cols.find("timestamp") {
        let mut samples = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let [open, high, low, close, volume] = parse_ohlcv(&record)?;
            let timestamp = timestamp_at(&record, ts_idx)?;
            let mut sample = PriceSample::new(timestamp, open, high, low, close, volume);
            // An explicit session date overrides the calendar date of the timestamp.
            if let Some(idx) = date_idx {
                sample.date = timestamp_at(&record, idx)?.date();
            }
            samples.push(sample);
        }
        debug!(rows = samples.len(), "read intraday price samples");
        return Ok(PriceSeries::Intraday(samples));
    }

    let date_idx =
        date_idx.ok_or_else(|| LoadError::MissingColumn("timestamp or date".to_string()))?;
    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let [open, high, low, close, volume] = parse_ohlcv(&record)?;
        let date = timestamp_at(&record, date_idx)?.date();
        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    debug!(rows = bars.len(), "read daily price bars");
    Ok(PriceSeries::Daily(bars))
}

pub fn load_prices(path: &Path) -> Result<PriceSeries, LoadError> {
    read_prices(open_file(path)?)
}

// ─── Trades ─────────────────────────────────────────────────────────

/// Read a trade log from any reader.
pub fn read_trades<R: Read>(reader: R) -> Result<Vec<Trade>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns { headers: &headers };
    let entry_idx = cols.require("entry_time")?;
    let pnl_idx = cols.require("pnl")?;

    let mut trades = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let entry_time = timestamp_at(&record, entry_idx)?;
        let pnl = required_number(&record, pnl_idx, "pnl")?;
        trades.push(Trade::new(entry_time, pnl));
    }
    debug!(trades = trades.len(), "read trade log");
    Ok(trades)
}

pub fn load_trades(path: &Path) -> Result<Vec<Trade>, LoadError> {
    read_trades(open_file(path)?)
}
