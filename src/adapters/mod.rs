//! Concrete adapter implementations for the port traits.

pub mod bands_signals;
pub mod csv_adapter;
pub mod file_config_adapter;
