//! Domain error types.
//!
//! `DataUnavailable` is recoverable (the symbol is skipped with a diagnostic);
//! the signal-join and indicator-computation faults abort the run, since
//! continuing would fabricate trading decisions on missing data. End of
//! stream is not an error anywhere in this crate.

use chrono::NaiveDate;

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("no price data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("signal join fault for {symbol} on {date}: {matches} rows matched, expected exactly 1")]
    SignalJoin {
        symbol: String,
        date: NaiveDate,
        matches: usize,
    },

    #[error("indicator engine produced no signals for a non-empty universe")]
    IndicatorComputation,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ReplayError> for std::process::ExitCode {
    fn from(err: &ReplayError) -> Self {
        let code: u8 = match err {
            ReplayError::Io(_) => 1,
            ReplayError::ConfigParse { .. }
            | ReplayError::ConfigMissing { .. }
            | ReplayError::ConfigInvalid { .. } => 2,
            ReplayError::DataUnavailable { .. } => 3,
            ReplayError::SignalJoin { .. } | ReplayError::IndicatorComputation => 4,
        };
        std::process::ExitCode::from(code)
    }
}
