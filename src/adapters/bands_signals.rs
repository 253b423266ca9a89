//! Default signal engine: band-cross entry/exit flags.
//!
//! For each symbol's series the engine computes a short SMA of the close,
//! Bollinger bands over the typical price, ADX, and a fixed-ratio trailing
//! stop, then derives buy/sell flags from crosses measured against the row
//! two bars back. Symbols never mix: each series is computed independently,
//! then the rows are emitted per bar of the input table.

use crate::domain::bar::Bar;
use crate::domain::indicator::{adx, bollinger, sma};
use crate::domain::signal::SignalRow;
use crate::ports::signal_port::SignalPort;

pub struct BandsCrossSignals {
    pub sma_period: usize,
    pub bb_period: usize,
    pub bb_multiplier: f64,
    pub adx_period: usize,
    /// Trailing stop level as a fraction of the close.
    pub trailing_stop_ratio: f64,
}

impl Default for BandsCrossSignals {
    fn default() -> Self {
        BandsCrossSignals {
            sma_period: 5,
            bb_period: 20,
            bb_multiplier: 2.0,
            adx_period: 14,
            trailing_stop_ratio: 0.90,
        }
    }
}

impl BandsCrossSignals {
    fn compute_symbol(&self, bars: &[&Bar]) -> Vec<SignalRow> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();

        let sma_series = sma(&closes, self.sma_period);
        let bands = bollinger(&typical, self.bb_period, self.bb_multiplier);
        let adx_series = adx(&highs, &lows, &closes, self.adx_period);

        let mut rows = Vec::with_capacity(bars.len());
        for (i, bar) in bars.iter().enumerate() {
            // Cross conditions compare against the row two bars back; any
            // NaN comparison is false, so warmup rows carry no flags.
            let (buy, sell) = if i >= 2 {
                let cur_close = closes[i];
                let old_close = closes[i - 2];

                let buy = (cur_close > bands.middle[i] && old_close <= bands.middle[i - 2])
                    || (cur_close > bands.lower[i] && old_close < bands.lower[i - 2])
                    || (sma_series[i] > bands.middle[i]
                        && sma_series[i - 2] <= bands.middle[i - 2]);

                let sell = (cur_close < bands.middle[i] && old_close > bands.middle[i - 2])
                    || (cur_close < bands.lower[i] && old_close > bands.lower[i - 2]);

                (buy, sell)
            } else {
                (false, false)
            };

            rows.push(SignalRow {
                date: bar.date,
                symbol: bar.symbol.clone(),
                buy,
                sell,
                sma: sma_series[i],
                bb_lowerband: bands.lower[i],
                bb_middleband: bands.middle[i],
                bb_upperband: bands.upper[i],
                adx: adx_series[i],
                trailing_stop: bar.close * self.trailing_stop_ratio,
                close: bar.close,
            });
        }
        rows
    }
}

impl SignalPort for BandsCrossSignals {
    fn compute_signals(&self, bars: &[Bar]) -> Vec<SignalRow> {
        // Group per symbol, preserving each symbol's chronological order.
        let mut order: Vec<&str> = Vec::new();
        for bar in bars {
            if !order.contains(&bar.symbol.as_str()) {
                order.push(&bar.symbol);
            }
        }

        let mut rows = Vec::with_capacity(bars.len());
        for symbol in order {
            let series: Vec<&Bar> = bars.iter().filter(|b| b.symbol == symbol).collect();
            rows.extend(self.compute_symbol(&series));
        }
        rows
    }
}
