#![allow(dead_code)]

use bandtrader::domain::bar::Bar;
use bandtrader::domain::error::ReplayError;
use bandtrader::domain::signal::SignalRow;
use bandtrader::ports::data_port::DataPort;
use bandtrader::ports::signal_port::SignalPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<Bar>, ReplayError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, ReplayError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ReplayError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Signal engine that replays a scripted table.
pub struct MockSignalPort {
    pub rows: Vec<SignalRow>,
}

impl MockSignalPort {
    pub fn new(rows: Vec<SignalRow>) -> Self {
        Self { rows }
    }
}

impl SignalPort for MockSignalPort {
    fn compute_signals(&self, _bars: &[Bar]) -> Vec<SignalRow> {
        self.rows.clone()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date_str: &str, close: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adj_close: close,
        volume: 1000,
    }
}

pub fn generate_bars(symbol: &str, start_date: &str, count: usize, start_price: f64) -> Vec<Bar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| Bar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            adj_close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}

/// One quiet signal row (no flags, no firing rules) matching a bar.
pub fn neutral_row(bar: &Bar) -> SignalRow {
    SignalRow {
        date: bar.date,
        symbol: bar.symbol.clone(),
        buy: false,
        sell: false,
        sma: bar.close,
        bb_lowerband: bar.close - 5.0,
        bb_middleband: bar.close,
        bb_upperband: bar.close + 5.0,
        adx: 5.0,
        trailing_stop: bar.close * 0.9,
        close: bar.close,
    }
}

/// Neutral rows for every bar of every table, for totality-style tests.
pub fn neutral_rows(tables: &[&[Bar]]) -> Vec<SignalRow> {
    tables
        .iter()
        .flat_map(|bars| bars.iter().map(neutral_row))
        .collect()
}
