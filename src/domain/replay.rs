//! Replay session: subscriptions plus the driving loop.
//!
//! A session owns one raw bar table per subscribed symbol, the price cache,
//! and one state machine per symbol. `run` performs the single-threaded
//! pull loop: pull the next merged bar, attach its signal row, update the
//! price cache, evaluate the symbol's state machine, append any intent to
//! the queue. Nothing suspends mid-bar and nothing is shared across threads.

use crate::domain::bar::Bar;
use crate::domain::error::ReplayError;
use crate::domain::order::IntentQueue;
use crate::domain::price_cache::PriceCache;
use crate::domain::signal_index::SignalIndex;
use crate::domain::strategy::SignalStrategy;
use crate::domain::stream::{DateWindow, MergedStream};
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalPort;
use std::collections::BTreeMap;

pub const DEFAULT_BASE_QUANTITY: i64 = 100;

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub window: DateWindow,
    pub base_quantity: i64,
    pub track_adj_returns: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            window: DateWindow::unbounded(),
            base_quantity: DEFAULT_BASE_QUANTITY,
            track_adj_returns: false,
        }
    }
}

/// Outcome of a completed replay.
#[derive(Debug)]
pub struct ReplayResult {
    /// Order intents in emission order, for the downstream consumer.
    pub intents: IntentQueue,
    pub bars_replayed: usize,
}

pub struct ReplaySession<'a> {
    data_port: &'a dyn DataPort,
    config: ReplayConfig,
    /// Per-symbol raw tables, keyed by symbol so iteration is deterministic.
    tables: BTreeMap<String, Vec<Bar>>,
    price_cache: PriceCache,
}

impl<'a> ReplaySession<'a> {
    pub fn new(data_port: &'a dyn DataPort, config: ReplayConfig) -> Self {
        let track = config.track_adj_returns;
        ReplaySession {
            data_port,
            config,
            tables: BTreeMap::new(),
            price_cache: PriceCache::new(track),
        }
    }

    /// Subscribe a symbol and load its raw table.
    ///
    /// Idempotent: re-subscribing is a no-op with a diagnostic. A symbol
    /// whose data cannot be read is also a no-op with a diagnostic; the rest
    /// of the universe proceeds without it.
    pub fn subscribe(&mut self, symbol: &str) {
        if self.tables.contains_key(symbol) {
            eprintln!("Warning: {} is already subscribed", symbol);
            return;
        }

        let bars = match self.data_port.fetch_ohlcv(symbol) {
            Ok(bars) if !bars.is_empty() => bars,
            Ok(_) => {
                eprintln!("Warning: skipping {} (no data found)", symbol);
                return;
            }
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                return;
            }
        };

        self.price_cache.seed(&bars[0]);
        self.tables.insert(symbol.to_string(), bars);
    }

    pub fn subscribed(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn price_cache(&self) -> &PriceCache {
        &self.price_cache
    }

    /// Build the merged, windowed stream from the current subscriptions.
    /// The session's tables are left intact, so a finished replay can be
    /// rerun by building a fresh stream.
    pub fn merged_stream(&self) -> MergedStream {
        MergedStream::build(self.tables.values().cloned().collect(), self.config.window)
    }

    /// Replay every subscribed bar through the signal engine's output.
    ///
    /// Signals are computed once over the full concatenated history, then
    /// each windowed bar is joined against the index. A missing or ambiguous
    /// join aborts the run; an engine that returns nothing for a non-empty
    /// universe aborts before the first bar.
    pub fn run(&mut self, signal_port: &dyn SignalPort) -> Result<ReplayResult, ReplayError> {
        let index = self.build_signal_index(signal_port)?;

        let mut strategies: BTreeMap<String, SignalStrategy> = self
            .tables
            .keys()
            .map(|symbol| {
                (
                    symbol.clone(),
                    SignalStrategy::new(symbol.clone(), self.config.base_quantity),
                )
            })
            .collect();

        let mut intents = IntentQueue::new();
        let mut bars_replayed = 0;

        for bar in self.merged_stream() {
            let row = index.attach(&bar)?.clone();
            self.price_cache.update(&bar);

            // The strategy map was built from the same tables the stream
            // was, so the lookup cannot miss.
            if let Some(strategy) = strategies.get_mut(&bar.symbol) {
                if let Some(intent) = strategy.on_signal(&row) {
                    intents.push(intent);
                }
            }

            bars_replayed += 1;
        }

        Ok(ReplayResult {
            intents,
            bars_replayed,
        })
    }

    fn build_signal_index(&self, signal_port: &dyn SignalPort) -> Result<SignalIndex, ReplayError> {
        // Full-history merge, unwindowed: the indicator engine needs every
        // bar so warmup falls before the window instead of inside it.
        let history: Vec<Bar> =
            MergedStream::build(self.tables.values().cloned().collect(), DateWindow::unbounded())
                .collect();

        let rows = signal_port.compute_signals(&history);
        if rows.is_empty() && !history.is_empty() {
            return Err(ReplayError::IndicatorComputation);
        }

        SignalIndex::build(rows)
    }
}

/// Parse a comma-separated symbol list from configuration.
///
/// Symbols are upper-cased; empty tokens and duplicates are rejected so a
/// typo fails loudly instead of silently halving the universe.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, ReplayError> {
    let mut symbols = Vec::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ReplayError::ConfigInvalid {
                section: "replay".into(),
                key: "symbols".into(),
                reason: "empty symbol in list".into(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if symbols.contains(&symbol) {
            return Err(ReplayError::ConfigInvalid {
                section: "replay".into(),
                key: "symbols".into(),
                reason: format!("duplicate symbol: {}", symbol),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
