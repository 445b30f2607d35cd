// src/fs/mod.rs

//! Filesystem access used by path collection and change detection.
//!
//! Everything the reload engine learns about the disk goes through
//! [`FileSystem`], so the collector and detector can run against the
//! in-memory [`mock::MockFileSystem`] in tests.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// True for regular files, following symlinks.
    fn is_file(&self, path: &Path) -> bool;
    /// True for directories, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symbolic link. The link is not followed.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Absolute path of `path` with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Last modification time of `path`.
    fn modified(&self, path: &Path) -> Result<SystemTime>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("resolving {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let meta = fs::metadata(path).with_context(|| format!("stat {:?}", path))?;
        meta.modified()
            .with_context(|| format!("reading modification time of {:?}", path))
    }
}
