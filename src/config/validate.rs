// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, RawReloaderSection};
use crate::errors::{ReloaderError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReloaderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let section = raw.reloader;
        let interval = validate_interval(&section)?;
        validate_extensions(&section)?;
        validate_search_path(&section)?;
        Ok(ConfigFile::new_unchecked(section, interval))
    }
}

fn validate_interval(section: &RawReloaderSection) -> Result<Duration> {
    let interval = parse_duration(&section.interval).map_err(|e| {
        ReloaderError::ConfigError(format!("[reloader].interval: {e}"))
    })?;

    if interval.is_zero() {
        return Err(ReloaderError::ConfigError(
            "[reloader].interval must be greater than zero".to_string(),
        ));
    }

    Ok(interval)
}

fn validate_extensions(section: &RawReloaderSection) -> Result<()> {
    let Some(extensions) = section.extensions.as_ref() else {
        return Ok(());
    };

    if extensions.is_empty() {
        return Err(ReloaderError::ConfigError(
            "[reloader].extensions must list at least one extension".to_string(),
        ));
    }

    for ext in extensions {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ReloaderError::ConfigError(format!(
                "[reloader].extensions: invalid extension '{ext}' (expected e.g. \"py\", without the dot)"
            )));
        }
    }

    Ok(())
}

fn validate_search_path(section: &RawReloaderSection) -> Result<()> {
    if section.search_path.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ReloaderError::ConfigError(
            "[reloader].search_path entries must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Parse `<integer><unit>` with unit `ms`, `s`, `m` or `h` (case-insensitive,
/// blanks allowed around the unit).
///
/// Values that do not fit a [`Duration`] of whole seconds are rejected.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' has no unit; expected ms, s, m or h"))?;
    let (digits, unit) = s.split_at(split);
    let value: u64 = digits
        .parse()
        .map_err(|e| format!("invalid number in duration '{s}': {e}"))?;

    let secs_per_unit: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        other => {
            return Err(format!(
                "unsupported duration unit '{other}'; expected ms, s, m or h"
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
