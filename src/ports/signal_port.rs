//! Indicator engine port trait.

use crate::domain::bar::Bar;
use crate::domain::signal::SignalRow;

pub trait SignalPort {
    /// Map the full multi-symbol price history to one signal row per bar.
    ///
    /// Must not panic for well-formed input; an internal failure is reported
    /// as an empty table, which the caller treats as fatal for a non-empty
    /// universe.
    fn compute_signals(&self, bars: &[Bar]) -> Vec<SignalRow>;
}
