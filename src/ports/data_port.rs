//! Raw price source port trait.

use crate::domain::bar::Bar;
use crate::domain::error::ReplayError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Full chronological history for one symbol. Date windowing belongs to
    /// the stream merger, not the source: the indicator engine needs every
    /// bar for warmup.
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<Bar>, ReplayError>;

    fn list_symbols(&self) -> Result<Vec<String>, ReplayError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ReplayError>;
}
