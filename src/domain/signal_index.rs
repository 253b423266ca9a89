//! Signal lookup keyed by (date, symbol).
//!
//! Built once from the indicator engine's output over the full subscribed
//! universe; attachment must find exactly one row per replayed bar. Zero or
//! multiple matches indicate an upstream indicator or date-alignment bug and
//! abort the run rather than guessing.

use crate::domain::bar::Bar;
use crate::domain::error::ReplayError;
use crate::domain::signal::SignalRow;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SignalIndex {
    rows: HashMap<(NaiveDate, String), SignalRow>,
}

impl SignalIndex {
    /// Index the signal table, normalizing each row first.
    ///
    /// A duplicate (date, symbol) key is a [`ReplayError::SignalJoin`] with
    /// `matches: 2`: picking either row would make replay output depend on
    /// table order.
    pub fn build(rows: Vec<SignalRow>) -> Result<Self, ReplayError> {
        let mut index = HashMap::with_capacity(rows.len());
        for mut row in rows {
            row.normalize();
            let key = (row.date, row.symbol.clone());
            if index.contains_key(&key) {
                return Err(ReplayError::SignalJoin {
                    symbol: row.symbol,
                    date: row.date,
                    matches: 2,
                });
            }
            index.insert(key, row);
        }
        Ok(SignalIndex { rows: index })
    }

    /// Retrieve the unique row for a bar's (date, symbol).
    pub fn attach(&self, bar: &Bar) -> Result<&SignalRow, ReplayError> {
        self.rows
            .get(&(bar.date, bar.symbol.clone()))
            .ok_or_else(|| ReplayError::SignalJoin {
                symbol: bar.symbol.clone(),
                date: bar.date,
                matches: 0,
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
