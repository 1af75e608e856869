//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! The first day has no previous close and its gap terms count as zero.
//! ATR is the exponentially weighted mean of TR (see `ewm`).

use super::ewm::ewm_mean;
use super::Indicator;
use crate::domain::DailyBar;

#[derive(Debug, Clone)]
pub struct Atr {
    span: usize,
    name: String,
}

impl Atr {
    /// # Panics
    ///
    /// Panics if `span` is zero.
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "ATR span must be >= 1");
        Self {
            span,
            name: format!("atr_{span}"),
        }
    }
}

/// Compute the True Range series from daily bars.
pub fn true_range(bars: &[DailyBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(pc) => range.max((bar.high - pc).abs()).max((bar.low - pc).abs()),
                None => range.max(0.0),
            }
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        ewm_mean(&true_range(bars), self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (90.0, 92.0, 88.0, 91.0), // TR = max(4, |92-100|, |88-100|) = 12
        ]);
        assert_approx(true_range(&bars)[1], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn first_day_without_range_is_zero() {
        let bars = make_ohlc_bars(&[(100.0, 100.0, 100.0, 100.0)]);
        assert_approx(true_range(&bars)[0], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_span_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
        ]);
        let result = Atr::new(3).compute(&bars);
        // decay 0.5: [10, (8+5)/1.5, (9+4+2.5)/1.75]
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 13.0 / 1.5, DEFAULT_EPSILON);
        assert_approx(result[2], 15.5 / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_is_non_negative() {
        let bars = make_ohlc_bars(&[
            (10.0, 11.0, 9.0, 10.5),
            (10.5, 10.6, 10.4, 10.5),
            (10.5, 12.0, 10.0, 11.8),
        ]);
        assert!(Atr::new(21).compute(&bars).iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn empty_bars_empty_atr() {
        assert!(Atr::new(21).compute(&[]).is_empty());
    }
}
