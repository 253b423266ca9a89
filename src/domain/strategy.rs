//! Per-symbol position state machine.
//!
//! Two states: FLAT and LONG. FLAT→LONG on a buy flag (records the entry
//! date, emits BUY); LONG→FLAT on a sell flag or one of two computed exits
//! (emits SELL). No re-entry while LONG and no short side. The stream ending
//! mid-position leaves the machine LONG.
//!
//! Exit rules, evaluated in fixed priority while LONG, first hit wins:
//! 1. Trend cross: the previous row's trend-average was above the middle
//!    band and the current row's is at or below it. Needs at least two rows
//!    since entry.
//! 2. Trailing stop: the current close is below the highest trailing-stop
//!    level seen since entry and the current trend-strength exceeds
//!    [`ADX_EXIT_THRESHOLD`].
//!
//! Only the previous row and a running since-entry stop maximum are retained;
//! the rules never need more history than that.

use crate::domain::order::OrderIntent;
use crate::domain::signal::SignalRow;
use chrono::NaiveDate;

/// Trend-strength floor below which the trailing stop is ignored.
pub const ADX_EXIT_THRESHOLD: f64 = 10.0;

#[derive(Debug)]
pub struct SignalStrategy {
    symbol: String,
    base_quantity: i64,
    invested: bool,
    entry_date: Option<NaiveDate>,
    /// Last row seen, for the trend-cross comparison.
    prev_row: Option<SignalRow>,
    /// Rows observed with date >= entry date, the entry row included.
    rows_since_entry: usize,
    /// Highest trailing-stop level observed since entry.
    stop_high_water: f64,
}

impl SignalStrategy {
    pub fn new(symbol: impl Into<String>, base_quantity: i64) -> Self {
        SignalStrategy {
            symbol: symbol.into(),
            base_quantity,
            invested: false,
            entry_date: None,
            prev_row: None,
            rows_since_entry: 0,
            stop_high_water: f64::NEG_INFINITY,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn invested(&self) -> bool {
        self.invested
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        self.entry_date
    }

    /// Evaluate one signal observation, delivered in stream order.
    ///
    /// Returns the order intent to emit, if any. Entry and exit are mutually
    /// exclusive within a single evaluation: the entry check runs only while
    /// FLAT, the exit check only while LONG.
    pub fn on_signal(&mut self, row: &SignalRow) -> Option<OrderIntent> {
        let mut exit = false;

        if self.invested {
            if self.entry_date.is_some_and(|entry| row.date >= entry) {
                self.rows_since_entry += 1;
                if row.trailing_stop > self.stop_high_water {
                    self.stop_high_water = row.trailing_stop;
                }
            }

            exit = self.trend_cross_exit(row);
            if !exit {
                exit = self.trailing_stop_exit(row);
            }
        }

        let intent = if !self.invested && row.buy {
            self.invested = true;
            self.entry_date = Some(row.date);
            self.rows_since_entry = 1;
            self.stop_high_water = row.trailing_stop;
            Some(OrderIntent::buy(self.symbol.clone(), self.base_quantity))
        } else if self.invested && (row.sell || exit) {
            self.invested = false;
            self.entry_date = None;
            self.rows_since_entry = 0;
            self.stop_high_water = f64::NEG_INFINITY;
            Some(OrderIntent::sell(self.symbol.clone(), self.base_quantity))
        } else {
            None
        };

        self.prev_row = Some(row.clone());
        intent
    }

    /// Downward cross of the trend-average through the middle band.
    fn trend_cross_exit(&self, row: &SignalRow) -> bool {
        if self.rows_since_entry < 2 {
            return false;
        }
        match &self.prev_row {
            Some(prev) => prev.sma > prev.bb_middleband && row.sma <= row.bb_middleband,
            None => false,
        }
    }

    /// Close fell below the since-entry stop high-water mark in a trending
    /// market.
    fn trailing_stop_exit(&self, row: &SignalRow) -> bool {
        row.close < self.stop_high_water && row.adx > ADX_EXIT_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Side;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn row(day: u32) -> SignalRow {
        SignalRow {
            date: date(day),
            symbol: "AAPL".into(),
            buy: false,
            sell: false,
            sma: 100.0,
            bb_lowerband: 95.0,
            bb_middleband: 100.0,
            bb_upperband: 105.0,
            adx: 5.0,
            trailing_stop: 90.0,
            close: 100.0,
        }
    }

    fn buy_row(day: u32) -> SignalRow {
        SignalRow { buy: true, ..row(day) }
    }

    #[test]
    fn flat_state_is_idempotent_without_signals() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        for day in 1..=10 {
            assert_eq!(strategy.on_signal(&row(day)), None);
        }
        assert!(!strategy.invested());
        assert_eq!(strategy.entry_date(), None);
    }

    #[test]
    fn buy_flag_enters_exactly_once() {
        let mut strategy = SignalStrategy::new("AAPL", 100);

        assert_eq!(strategy.on_signal(&row(1)), None);
        let intent = strategy.on_signal(&buy_row(2)).expect("entry intent");
        assert_eq!(intent.side, Side::Buy);
        assert_eq!(intent.symbol, "AAPL");
        assert_eq!(intent.quantity, 100);
        assert!(strategy.invested());
        assert_eq!(strategy.entry_date(), Some(date(2)));

        // A second buy flag while LONG emits nothing.
        assert_eq!(strategy.on_signal(&buy_row(3)), None);
        assert_eq!(strategy.entry_date(), Some(date(2)));
    }

    #[test]
    fn sell_flag_exits() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        strategy.on_signal(&buy_row(1));

        let sell = SignalRow { sell: true, ..row(2) };
        let intent = strategy.on_signal(&sell).expect("exit intent");
        assert_eq!(intent.side, Side::Sell);
        assert!(!strategy.invested());
        assert_eq!(strategy.entry_date(), None);
    }

    #[test]
    fn sell_flag_while_flat_is_ignored() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        let sell = SignalRow { sell: true, ..row(1) };
        assert_eq!(strategy.on_signal(&sell), None);
        assert!(!strategy.invested());
    }

    #[test]
    fn trend_cross_exits() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        strategy.on_signal(&buy_row(1));

        // sma above middle band, no cross yet
        let above = SignalRow {
            sma: 102.0,
            bb_middleband: 100.0,
            ..row(2)
        };
        assert_eq!(strategy.on_signal(&above), None);

        // sma drops to the middle band: downward cross, "at or below" counts
        let crossed = SignalRow {
            sma: 100.0,
            bb_middleband: 100.0,
            ..row(3)
        };
        let intent = strategy.on_signal(&crossed).expect("trend-cross exit");
        assert_eq!(intent.side, Side::Sell);
    }

    #[test]
    fn trend_cross_skipped_on_entry_bar() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        // Establish a prior row with sma above the band while FLAT.
        let above = SignalRow {
            sma: 102.0,
            bb_middleband: 100.0,
            ..row(1)
        };
        strategy.on_signal(&above);

        // The entry bar itself satisfies the cross shape, but only one row
        // has been seen since entry, so the rule is skipped and the entry
        // proceeds.
        let entry = SignalRow {
            buy: true,
            sma: 99.0,
            bb_middleband: 100.0,
            ..row(2)
        };
        let intent = strategy.on_signal(&entry).expect("entry");
        assert_eq!(intent.side, Side::Buy);
        assert!(strategy.invested());
    }

    #[test]
    fn trend_cross_needs_prior_above() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        strategy.on_signal(&buy_row(1));

        // sma below the band on both rows: no cross
        let below = SignalRow {
            sma: 98.0,
            bb_middleband: 100.0,
            ..row(2)
        };
        assert_eq!(strategy.on_signal(&below), None);
        let still_below = SignalRow {
            sma: 97.0,
            bb_middleband: 100.0,
            ..row(3)
        };
        assert_eq!(strategy.on_signal(&still_below), None);
        assert!(strategy.invested());
    }

    #[test]
    fn trailing_stop_exits_when_trending() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        let entry = SignalRow {
            buy: true,
            trailing_stop: 95.0,
            ..row(1)
        };
        strategy.on_signal(&entry);

        // Stop level ratchets up with price.
        let higher = SignalRow {
            close: 110.0,
            trailing_stop: 99.0,
            ..row(2)
        };
        assert_eq!(strategy.on_signal(&higher), None);

        // Close falls below the 99 high-water mark with adx above the
        // threshold.
        let breached = SignalRow {
            close: 98.0,
            trailing_stop: 88.2,
            adx: 25.0,
            ..row(3)
        };
        let intent = strategy.on_signal(&breached).expect("trailing-stop exit");
        assert_eq!(intent.side, Side::Sell);
    }

    #[test]
    fn trailing_stop_requires_trend_strength() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        let entry = SignalRow {
            buy: true,
            trailing_stop: 99.0,
            ..row(1)
        };
        strategy.on_signal(&entry);

        // Below the stop but adx exactly at the threshold: no exit, strictly
        // greater is required.
        let weak = SignalRow {
            close: 98.0,
            trailing_stop: 88.2,
            adx: ADX_EXIT_THRESHOLD,
            ..row(2)
        };
        assert_eq!(strategy.on_signal(&weak), None);
        assert!(strategy.invested());
    }

    #[test]
    fn exit_fires_once_when_both_rules_hold() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        let entry = SignalRow {
            buy: true,
            trailing_stop: 99.0,
            sma: 102.0,
            bb_middleband: 100.0,
            ..row(1)
        };
        strategy.on_signal(&entry);

        // Trend-cross and trailing-stop both satisfied on the same row; the
        // trend-cross branch wins and exactly one SELL is emitted.
        let both = SignalRow {
            sma: 99.0,
            bb_middleband: 100.0,
            close: 98.0,
            adx: 30.0,
            trailing_stop: 88.2,
            ..row(2)
        };
        let intent = strategy.on_signal(&both).expect("exit");
        assert_eq!(intent.side, Side::Sell);
        assert!(!strategy.invested());
    }

    #[test]
    fn warmup_nan_rows_never_fire_rules() {
        let mut strategy = SignalStrategy::new("AAPL", 100);
        strategy.on_signal(&buy_row(1));

        let warmup = SignalRow {
            sma: 0.0,
            bb_middleband: f64::NAN,
            adx: f64::NAN,
            close: 1.0,
            trailing_stop: f64::NAN,
            ..row(2)
        };
        assert_eq!(strategy.on_signal(&warmup), None);
        assert!(strategy.invested());
    }

    #[test]
    fn stop_window_resets_on_reentry() {
        let mut strategy = SignalStrategy::new("AAPL", 100);

        // First round trip ratchets the stop up to 99.
        let entry = SignalRow {
            buy: true,
            trailing_stop: 99.0,
            ..row(1)
        };
        strategy.on_signal(&entry);
        let sell = SignalRow {
            sell: true,
            trailing_stop: 99.0,
            ..row(2)
        };
        strategy.on_signal(&sell);

        // Re-enter with a lower stop level; the stale 99 mark must not leak
        // into the new position's window.
        let reentry = SignalRow {
            buy: true,
            trailing_stop: 80.0,
            ..row(3)
        };
        strategy.on_signal(&reentry);

        let probe = SignalRow {
            close: 90.0, // above the new stop, below the stale one
            adx: 25.0,
            trailing_stop: 80.0,
            ..row(4)
        };
        assert_eq!(strategy.on_signal(&probe), None);
        assert!(strategy.invested());
    }
}
