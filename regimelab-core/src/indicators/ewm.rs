//! Exponentially weighted mean with minimum periods 1.
//!
//! Adjusted form: y[t] = sum (1-a)^i x[t-i] / sum (1-a)^i, a = 2 / (span + 1).
//! The first output equals the first input, so there is no warmup gap.

use super::Indicator;
use crate::domain::DailyBar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    /// # Panics
    ///
    /// Panics if `span` is zero.
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ewm_mean(&closes, self.span)
    }
}

/// Smoothing factor for a span.
pub fn alpha_for_span(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Adjusted exponentially weighted mean of an arbitrary series.
///
/// Used for both the close averages and the true-range smoothing.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    let decay = 1.0 - alpha_for_span(span);
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    values
        .iter()
        .map(|&x| {
            numerator = x + decay * numerator;
            denominator = 1.0 + decay * denominator;
            numerator / denominator
        })
        .collect()
}
