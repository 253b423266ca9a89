//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::bands_signals::BandsCrossSignals;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_optional_date, validate_replay_config};
use crate::domain::error::ReplayError;
use crate::domain::replay::{parse_symbols, ReplayConfig, ReplaySession, DEFAULT_BASE_QUANTITY};
use crate::domain::stream::DateWindow;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Signal-driven daily-bar replay engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay the subscribed universe and print order intents
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol list (comma-separated)
        #[arg(long)]
        symbols: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Validate config and show the resolved universe without replaying
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show bar count and date range for symbol(s)
    Info {
        #[arg(long)]
        symbols: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Replay {
            config,
            symbols,
            start,
            end,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbols.as_deref())
            } else {
                run_replay(&config, symbols.as_deref(), start, end)
            }
        }
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { symbols, config } => run_info(symbols.as_deref(), &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ReplayError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Build the replay parameters from config, with CLI overrides applied.
pub fn build_replay_config(
    adapter: &dyn ConfigPort,
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
) -> Result<ReplayConfig, ReplayError> {
    let start = match start_override {
        Some(d) => Some(d),
        None => parse_optional_date(adapter, "start_date")?,
    };
    let end = match end_override {
        Some(d) => Some(d),
        None => parse_optional_date(adapter, "end_date")?,
    };

    Ok(ReplayConfig {
        window: DateWindow::new(start, end),
        base_quantity: adapter.get_int("replay", "base_quantity", DEFAULT_BASE_QUANTITY),
        track_adj_returns: adapter.get_bool("replay", "adj_returns", false),
    })
}

/// Resolve the symbol universe from an override or the config file.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, ReplayError> {
    let raw = match symbols_override {
        Some(s) => s.to_string(),
        None => adapter
            .get_string("replay", "symbols")
            .ok_or_else(|| ReplayError::ConfigMissing {
                section: "replay".into(),
                key: "symbols".into(),
            })?,
    };
    parse_symbols(&raw)
}

fn data_dir(adapter: &dyn ConfigPort) -> Result<PathBuf, ReplayError> {
    adapter
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .ok_or_else(|| ReplayError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })
}

fn run_replay(
    config_path: &PathBuf,
    symbols_override: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_replay_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let replay_config = match build_replay_config(&adapter, start, end) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let csv_dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(csv_dir);

    let mut session = ReplaySession::new(&data_port, replay_config);
    for symbol in &symbols {
        session.subscribe(symbol);
    }

    if session.subscribed().is_empty() {
        eprintln!("error: no subscribed symbols with readable data");
        return ExitCode::from(3);
    }
    eprintln!(
        "Replaying {} of {} symbols",
        session.subscribed().len(),
        symbols.len()
    );

    let engine = BandsCrossSignals::default();
    let result = match session.run(&engine) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for intent in result.intents.iter() {
        println!("{}", intent);
    }
    eprintln!(
        "\nReplayed {} bars, emitted {} order intents",
        result.bars_replayed,
        result.intents.len()
    );

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf, symbols_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_replay_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let replay_config = match build_replay_config(&adapter, None, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nUniverse:");
    eprintln!("  symbols: {}", symbols.join(", "));
    match (replay_config.window.start, replay_config.window.end) {
        (Some(s), Some(e)) => eprintln!("  window:  {} to {}", s, e),
        (Some(s), None) => eprintln!("  window:  from {}", s),
        (None, Some(e)) => eprintln!("  window:  until {}", e),
        (None, None) => eprintln!("  window:  unbounded"),
    }
    eprintln!("  base quantity: {}", replay_config.base_quantity);

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let csv_dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(csv_dir);
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(symbols_override: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let csv_dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(csv_dir);

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}
