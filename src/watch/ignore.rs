// src/watch/ignore.rs

//! Directories the search-path traversal never descends into.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Basenames of cache, build and version-control directories.
///
/// Fixed; not configurable.
pub const IGNORED_DIR_NAMES: &[&str] = &[
    "__pycache__",
    ".git",
    ".hg",
    ".tox",
    ".nox",
    ".pytest_cache",
    ".mypy_cache",
    "target",
];

/// The fixed basename list plus the runtime installation prefixes whose
/// contents are never watched.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    runtime_prefixes: Vec<PathBuf>,
}

impl IgnoreRules {
    pub fn new<I, P>(runtime_prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            runtime_prefixes: runtime_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn runtime_prefixes(&self) -> &[PathBuf] {
        &self.runtime_prefixes
    }

    pub fn is_ignored_name(name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| IGNORED_DIR_NAMES.contains(&name))
    }

    /// True if `path` is one of the runtime prefixes or lies beneath one.
    ///
    /// Comparison is per path component, so `/usr/lib/py` does not cover
    /// `/usr/lib/python3`.
    pub fn is_under_runtime_prefix(&self, path: &Path) -> bool {
        self.runtime_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }

    /// Whether the traversal must skip `dir` and everything below it.
    pub fn skips_dir(&self, dir: &Path) -> bool {
        self.is_under_runtime_prefix(dir)
            || dir.file_name().is_some_and(Self::is_ignored_name)
    }
}

/// Installation roots of the Rust toolchain itself.
///
/// `CARGO_HOME` and `RUSTUP_HOME` when set, otherwise `~/.cargo` and
/// `~/.rustup`. Registry sources and the standard library live here and are
/// never edited during development.
pub fn toolchain_prefixes() -> Vec<PathBuf> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    [("CARGO_HOME", ".cargo"), ("RUSTUP_HOME", ".rustup")]
        .into_iter()
        .filter_map(|(var, fallback)| match std::env::var_os(var) {
            Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
            _ => home.as_ref().map(|h| h.join(fallback)),
        })
        .collect()
}
