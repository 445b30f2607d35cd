// src/logging.rs

//! Diagnostics for both halves of the reload protocol.
//!
//! Stdout belongs to the workload. The worker also prints its one-line
//! reload notice (`Detected changes in <path>, reloading`) there, and the
//! supervisor leaves the worker's stdout untouched. Everything `tracing`
//! emits therefore goes to stderr, which supervisor and worker share.
//!
//! The filter is chosen as follows:
//! 1. `--log-level`, applied to every target;
//! 2. `RELOADER_LOG`, read as an `EnvFilter` directive list such as
//!    `info,reloader::watch=trace`;
//! 3. `info`.
//!
//! The worker is spawned with the supervisor's arguments and environment,
//! so both processes log at the same level.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "RELOADER_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(log_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Filter for the given CLI level, falling back to `RELOADER_LOG`.
///
/// Unparseable `RELOADER_LOG` directives fall back to `info` instead of
/// stopping the program.
pub fn log_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }

    match std::env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .unwrap_or_else(|e| {
                eprintln!("ignoring {LOG_ENV_VAR}={directives:?}: {e}");
                EnvFilter::new(DEFAULT_DIRECTIVE)
            }),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
