// src/errors.rs

//! Error type shared by config loading, the supervisor and the worker.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReloaderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The worker process could not be started at all. Never retried.
    #[error("failed to launch worker {program:?}: {source}")]
    SpawnError {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReloaderError>;
