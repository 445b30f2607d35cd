// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::supervise::DEFAULT_POLL_INTERVAL;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [reloader]
/// interval = "1s"
/// search_path = ["src", "lib"]
/// extensions = ["py", "pyc", "rs"]
/// runtime_prefixes = ["/usr/lib/python3.12"]
/// include_toolchain_prefixes = true
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub reloader: RawReloaderSection,
}

/// `[reloader]` section, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReloaderSection {
    /// Poll interval as a duration string (`"500ms"`, `"1s"`, `"2m"`).
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Extra search-path entries, relative to the config file's directory.
    #[serde(default)]
    pub search_path: Vec<String>,

    /// Source extensions without the leading dot. `None` keeps the defaults.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Installation prefixes never traversed.
    #[serde(default)]
    pub runtime_prefixes: Vec<String>,

    /// Also exclude `CARGO_HOME` / `RUSTUP_HOME`.
    #[serde(default = "default_true")]
    pub include_toolchain_prefixes: bool,
}

fn default_interval() -> String {
    "1s".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RawReloaderSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            search_path: Vec::new(),
            extensions: None,
            runtime_prefixes: Vec::new(),
            include_toolchain_prefixes: default_true(),
        }
    }
}

/// Validated configuration.
///
/// Can only be obtained through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    interval: Duration,
    search_path: Vec<String>,
    extensions: Option<Vec<String>>,
    runtime_prefixes: Vec<String>,
    include_toolchain_prefixes: bool,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(section: RawReloaderSection, interval: Duration) -> Self {
        Self {
            interval,
            search_path: section.search_path,
            extensions: section.extensions,
            runtime_prefixes: section.runtime_prefixes,
            include_toolchain_prefixes: section.include_toolchain_prefixes,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn search_path(&self) -> &[String] {
        &self.search_path
    }

    pub fn extensions(&self) -> Option<&[String]> {
        self.extensions.as_deref()
    }

    pub fn runtime_prefixes(&self) -> &[String] {
        &self.runtime_prefixes
    }

    pub fn include_toolchain_prefixes(&self) -> bool {
        self.include_toolchain_prefixes
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawReloaderSection::default(), DEFAULT_POLL_INTERVAL)
    }
}
