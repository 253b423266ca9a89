//! Indicator math for the default signal engine.
//!
//! Each function maps input series to an output series of the same length,
//! with `NaN` in the warmup prefix. `NaN` propagates naturally through the
//! rule comparisons downstream, so no separate validity flags are carried.

pub mod sma;
pub mod bollinger;
pub mod adx;

pub use adx::adx;
pub use bollinger::{bollinger, BollingerBands};
pub use sma::sma;
