//! Bar stream merging.
//!
//! Each subscribed symbol contributes one chronologically sorted bar table.
//! The merger concatenates them, stable-sorts by (date, symbol) and exposes
//! the result as a consume-once iterator. The stable sort keeps duplicate
//! (date, symbol) rows in their source order, so the output never depends on
//! the order the tables were handed in.
//!
//! This is an idealized, backtest-only ordering: live ticks can arrive out of
//! order, historical daily bars do not.

use crate::domain::bar::Bar;
use chrono::NaiveDate;

/// Inclusive date bounds for a replay. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateWindow { start, end }
    }

    pub fn unbounded() -> Self {
        DateWindow::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// The globally ordered bar sequence across all subscribed symbols.
///
/// Non-decreasing by date; strictly increasing by symbol among equal dates.
/// Consumed exactly once via [`Iterator`]; replaying requires rebuilding.
#[derive(Debug)]
pub struct MergedStream {
    bars: std::vec::IntoIter<Bar>,
    total: usize,
}

impl MergedStream {
    /// Merge per-symbol tables into one ordered stream, bounded by `window`.
    ///
    /// Window bounds are resolved by binary search over the sorted dates, so
    /// a bound outside the data range yields an empty or partial stream
    /// rather than an error.
    pub fn build(tables: Vec<Vec<Bar>>, window: DateWindow) -> Self {
        let mut merged: Vec<Bar> = tables.into_iter().flatten().collect();
        merged.sort_by(|a, b| (a.date, a.symbol.as_str()).cmp(&(b.date, b.symbol.as_str())));

        let lo = match window.start {
            Some(start) => merged.partition_point(|b| b.date < start),
            None => 0,
        };
        let hi = match window.end {
            Some(end) => merged.partition_point(|b| b.date <= end),
            None => merged.len(),
        };

        let windowed = if lo < hi {
            merged[lo..hi].to_vec()
        } else {
            Vec::new()
        };

        let total = windowed.len();
        MergedStream {
            bars: windowed.into_iter(),
            total,
        }
    }

    /// Number of bars the stream was built with (not what remains).
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl Iterator for MergedStream {
    type Item = Bar;

    /// Exhaustion is the normal termination signal for the driving loop.
    fn next(&mut self) -> Option<Bar> {
        self.bars.next()
    }
}
