// src/config/mod.rs

//! Configuration loading and validation for reloader.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a `ConfigFile` (`validate.rs`).
//! - Merge it with CLI flags and the environment (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, RawConfigFile, RawReloaderSection};
pub use settings::{SEARCH_PATH_ENV_VAR, Settings, SettingsSources};
pub use validate::parse_duration;
