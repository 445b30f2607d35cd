// src/config/settings.rs

//! Effective reloader settings: the config file merged with CLI flags and
//! the `RELOADER_PATH` environment variable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::ConfigFile;
use crate::watch::{DEFAULT_SOURCE_EXTENSIONS, toolchain_prefixes};

/// Search-path entries prepended from the environment (platform path-list
/// syntax, like `PATH`).
pub const SEARCH_PATH_ENV_VAR: &str = "RELOADER_PATH";

/// Everything outside the config file that influences the settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsSources {
    /// Directory that CLI and environment paths resolve against.
    pub cwd: PathBuf,
    /// Directory that config-file paths resolve against.
    pub config_dir: PathBuf,
    /// `--path` flags, highest priority.
    pub cli_paths: Vec<PathBuf>,
    /// `--interval` flag; overrides the config file.
    pub cli_interval: Option<Duration>,
    /// Raw value of [`SEARCH_PATH_ENV_VAR`].
    pub env_path: Option<OsString>,
}

impl SettingsSources {
    /// Sources for the running process: its working directory and
    /// environment.
    pub fn from_process(
        config_dir: PathBuf,
        cli_paths: Vec<PathBuf>,
        cli_interval: Option<Duration>,
    ) -> std::io::Result<Self> {
        Ok(Self {
            cwd: std::env::current_dir()?,
            config_dir,
            cli_paths,
            cli_interval,
            env_path: std::env::var_os(SEARCH_PATH_ENV_VAR),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interval: Duration,
    /// Absolute, deduplicated, in priority order.
    pub search_path: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub runtime_prefixes: Vec<PathBuf>,
}

impl Settings {
    /// Merge `config` with `sources`.
    ///
    /// Search path priority: `--path` flags, then `RELOADER_PATH`, then the
    /// config file. With no entries at all the working directory is used.
    pub fn resolve(config: &ConfigFile, sources: &SettingsSources) -> Self {
        let mut search_path: Vec<PathBuf> = Vec::new();
        let mut push_unique = |path: PathBuf| {
            if !search_path.contains(&path) {
                search_path.push(path);
            }
        };

        for path in &sources.cli_paths {
            push_unique(resolve_against(&sources.cwd, path));
        }
        if let Some(env_path) = sources.env_path.as_ref() {
            for path in std::env::split_paths(env_path) {
                if !path.as_os_str().is_empty() {
                    push_unique(resolve_against(&sources.cwd, &path));
                }
            }
        }
        for entry in config.search_path() {
            push_unique(resolve_against(&sources.config_dir, Path::new(entry)));
        }
        if search_path.is_empty() {
            search_path.push(sources.cwd.clone());
        }

        let extensions = match config.extensions() {
            Some(exts) => exts.to_vec(),
            None => DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        };

        let mut runtime_prefixes: Vec<PathBuf> = config
            .runtime_prefixes()
            .iter()
            .map(|p| resolve_against(&sources.config_dir, Path::new(p)))
            .collect();
        if config.include_toolchain_prefixes() {
            runtime_prefixes.extend(toolchain_prefixes());
        }

        Self {
            interval: sources.cli_interval.unwrap_or(config.interval()),
            search_path,
            extensions,
            runtime_prefixes,
        }
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
