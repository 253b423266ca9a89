//! Latest-known price snapshots per symbol.

use crate::domain::bar::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceCacheEntry {
    pub close: f64,
    pub adj_close: f64,
    pub date: NaiveDate,
    /// Adjusted-close return of the most recent update, when tracking is on.
    pub adj_close_ret: Option<f64>,
}

/// Per-symbol latest close/adjusted-close, updated as each bar is dispatched.
///
/// With `track_adj_returns` set, the full sequence of adjusted-close
/// percentage returns is also accumulated across all symbols in dispatch
/// order.
#[derive(Debug, Default)]
pub struct PriceCache {
    entries: HashMap<String, PriceCacheEntry>,
    track_adj_returns: bool,
    adj_close_returns: Vec<f64>,
}

impl PriceCache {
    pub fn new(track_adj_returns: bool) -> Self {
        PriceCache {
            entries: HashMap::new(),
            track_adj_returns,
            adj_close_returns: Vec::new(),
        }
    }

    /// Seed a symbol's entry from its first bar, before replay starts.
    /// No return is computed for the seed.
    pub fn seed(&mut self, bar: &Bar) {
        self.entries.insert(
            bar.symbol.clone(),
            PriceCacheEntry {
                close: bar.close,
                adj_close: bar.adj_close,
                date: bar.date,
                adj_close_ret: None,
            },
        );
    }

    /// Record a dispatched bar as the symbol's latest prices.
    pub fn update(&mut self, bar: &Bar) {
        let prev_adj_close = self.entries.get(&bar.symbol).map(|e| e.adj_close);

        let adj_close_ret = if self.track_adj_returns {
            prev_adj_close.map(|prev| bar.adj_close / prev - 1.0)
        } else {
            None
        };
        if let Some(ret) = adj_close_ret {
            self.adj_close_returns.push(ret);
        }

        self.entries.insert(
            bar.symbol.clone(),
            PriceCacheEntry {
                close: bar.close,
                adj_close: bar.adj_close,
                date: bar.date,
                adj_close_ret,
            },
        );
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceCacheEntry> {
        self.entries.get(symbol)
    }

    pub fn adj_close_returns(&self) -> &[f64] {
        &self.adj_close_returns
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
