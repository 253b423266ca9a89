//! Daily OHLCV bar representation.

use chrono::NaiveDate;

/// One OHLCV observation for one symbol on one trading day.
///
/// Source series are expected to be strictly increasing by date per symbol
/// before they reach the merger.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
