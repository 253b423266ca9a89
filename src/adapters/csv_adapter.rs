//! Yahoo daily CSV data adapter.
//!
//! One file per symbol, `<SYMBOL>.csv`, columns
//! `date,open,high,low,close,volume,adj_close` with a header row. A file
//! without the adjusted-close column falls back to the raw close.

use crate::domain::bar::Bar;
use crate::domain::error::ReplayError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    csv_dir: PathBuf,
}

impl CsvAdapter {
    pub fn new(csv_dir: PathBuf) -> Self {
        Self { csv_dir }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.csv_dir.join(format!("{}.csv", symbol))
    }

    fn parse_field(
        record: &csv::StringRecord,
        idx: usize,
        name: &str,
        symbol: &str,
    ) -> Result<f64, ReplayError> {
        record
            .get(idx)
            .ok_or_else(|| ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("missing {} column", name),
            })?
            .parse()
            .map_err(|e| ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<Bar>, ReplayError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| ReplayError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| ReplayError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                ReplayError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let open = Self::parse_field(&record, 1, "open", symbol)?;
            let high = Self::parse_field(&record, 2, "high", symbol)?;
            let low = Self::parse_field(&record, 3, "low", symbol)?;
            let close = Self::parse_field(&record, 4, "close", symbol)?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| ReplayError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| ReplayError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid volume value: {}", e),
                })?;

            let adj_close = match record.get(6) {
                Some(_) => Self::parse_field(&record, 6, "adj_close", symbol)?,
                None => close,
            };

            bars.push(Bar {
                symbol: symbol.to_string(),
                date,
                open,
                high,
                low,
                close,
                adj_close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ReplayError> {
        let entries = fs::read_dir(&self.csv_dir)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ReplayError> {
        let bars = match self.fetch_ohlcv(symbol) {
            Ok(bars) => bars,
            Err(ReplayError::DataUnavailable { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
