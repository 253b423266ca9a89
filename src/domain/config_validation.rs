//! Configuration validation for the replay pipeline.
//!
//! Checks required keys and value shapes up front so a bad config fails
//! before any data is touched.

use crate::domain::error::ReplayError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// Validate the `[data]` and `[replay]` sections.
///
/// Required: `[data] csv_dir`, `[replay] symbols`. Optional date bounds must
/// parse as YYYY-MM-DD and `start_date` must not follow `end_date`;
/// `base_quantity` must be positive when given.
pub fn validate_replay_config(config: &dyn ConfigPort) -> Result<(), ReplayError> {
    if config.get_string("data", "csv_dir").is_none() {
        return Err(ReplayError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        });
    }

    match config.get_string("replay", "symbols") {
        Some(symbols) if !symbols.trim().is_empty() => {}
        Some(_) => {
            return Err(ReplayError::ConfigInvalid {
                section: "replay".into(),
                key: "symbols".into(),
                reason: "symbol list is empty".into(),
            });
        }
        None => {
            return Err(ReplayError::ConfigMissing {
                section: "replay".into(),
                key: "symbols".into(),
            });
        }
    }

    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ReplayError::ConfigInvalid {
                section: "replay".into(),
                key: "start_date".into(),
                reason: format!("start {} is after end {}", start, end),
            });
        }
    }

    let base_quantity = config.get_int("replay", "base_quantity", 100);
    if base_quantity <= 0 {
        return Err(ReplayError::ConfigInvalid {
            section: "replay".into(),
            key: "base_quantity".into(),
            reason: format!("must be positive, got {}", base_quantity),
        });
    }

    Ok(())
}

/// Parse an optional `[replay]` date key, YYYY-MM-DD.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, ReplayError> {
    match config.get_string("replay", key) {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ReplayError::ConfigInvalid {
                section: "replay".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
        None => Ok(None),
    }
}
