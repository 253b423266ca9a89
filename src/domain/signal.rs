//! Precomputed indicator rows consumed by the position state machine.

use chrono::NaiveDate;

/// One row of precomputed indicators for one symbol on one date.
///
/// Warmup rows carry `NaN` in the indicator columns; every rule comparison
/// against `NaN` is false, so nothing fires on them. `buy`/`sell` are already
/// normalized: absence of a signal is `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub buy: bool,
    pub sell: bool,
    /// Short-window moving average of close.
    pub sma: f64,
    pub bb_lowerband: f64,
    pub bb_middleband: f64,
    pub bb_upperband: f64,
    /// Trend-strength oscillator, direction-agnostic.
    pub adx: f64,
    /// Price floor relative to the reference close; protective exits key off
    /// the running maximum of this level since entry.
    pub trailing_stop: f64,
    /// Redundant copy of the bar close, kept for cross-checking.
    pub close: f64,
}

impl SignalRow {
    /// Normalize a missing trend-average to 0 so downstream comparisons are
    /// well-defined. Band and trend-strength columns keep their `NaN` warmup
    /// values.
    pub fn normalize(&mut self) {
        if self.sma.is_nan() {
            self.sma = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(sma: f64) -> SignalRow {
        SignalRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            symbol: "AAPL".into(),
            buy: false,
            sell: false,
            sma,
            bb_lowerband: 95.0,
            bb_middleband: 100.0,
            bb_upperband: 105.0,
            adx: 20.0,
            trailing_stop: 90.0,
            close: 101.0,
        }
    }

    #[test]
    fn normalize_replaces_nan_sma() {
        let mut row = sample_row(f64::NAN);
        row.normalize();
        assert!((row.sma - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_keeps_valid_sma() {
        let mut row = sample_row(101.5);
        row.normalize();
        assert!((row.sma - 101.5).abs() < f64::EPSILON);
    }

    #[test]
    fn normalize_leaves_band_warmup_nan() {
        let mut row = sample_row(f64::NAN);
        row.bb_middleband = f64::NAN;
        row.normalize();
        assert!(row.bb_middleband.is_nan());
    }
}
