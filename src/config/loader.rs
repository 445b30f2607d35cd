// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Reloader.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the config the CLI asked for.
///
/// - An explicit path must exist.
/// - Without one, [`DEFAULT_CONFIG_FILE`] is used if present; otherwise
///   built-in defaults apply.
///
/// Also returns the directory that relative `search_path` entries resolve
/// against (the config file's directory, or the working directory).
pub fn load_optional(explicit: Option<&Path>) -> Result<(ConfigFile, PathBuf)> {
    let cwd = std::env::current_dir()?;

    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };

    let config = match load_and_validate(&path) {
        Ok(config) => config,
        Err(crate::errors::ReloaderError::IoError(err))
            if explicit.is_none() && err.kind() == ErrorKind::NotFound =>
        {
            debug!(?path, "no config file found; using defaults");
            return Ok((ConfigFile::default(), cwd));
        }
        Err(err) => return Err(err),
    };

    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd,
    };

    Ok((config, base))
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
