// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The worker is launched with exactly the same arguments as the
//! supervisor, so both roles parse the same flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_duration;

/// Command-line arguments for `reloader`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reloader",
    version,
    about = "Run a workload and restart it whenever a watched source file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Reloader.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Add a directory (or file) to the module search path. Repeatable;
    /// takes priority over `RELOADER_PATH` and the config file.
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Pause between poll cycles, e.g. `500ms`, `1s`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_arg)]
    pub interval: Option<Duration>,

    /// Interval of the built-in heartbeat workload.
    #[arg(long, value_name = "DURATION", default_value = "5s", value_parser = parse_duration_arg)]
    pub heartbeat: Duration,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RELOADER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the role, the effective settings and the watched roots, then
    /// exit without starting anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    let duration = parse_duration(s)?;
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
