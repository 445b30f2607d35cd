#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use anyhow::Result;
use filetime::FileTime;
use tempfile::TempDir;

/// Builder for an on-disk source tree inside a temporary directory.
///
/// All paths passed in are relative to the tree root; all paths returned are
/// absolute. The directory is removed when the tree is dropped.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root of the tree (canonicalized, so it matches collected paths on
    /// platforms where the temp dir sits behind a symlink).
    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| self.dir.path().to_path_buf())
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create an empty file (and its parents).
    pub fn file(&self, rel: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, b"")?;
        Ok(path)
    }

    /// Create a directory (and its parents).
    pub fn dir(&self, rel: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Set the modification time of an existing file to `secs` after the
    /// epoch.
    pub fn set_mtime(&self, rel: &str, secs: i64) -> Result<()> {
        set_mtime(&self.path(rel), secs)
    }
}

pub fn set_mtime(path: &Path, secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))?;
    Ok(())
}

/// Push the modification time of `path` `secs` seconds into the future
/// relative to its current value.
pub fn bump_mtime(path: &Path, secs: u64) -> Result<()> {
    let current = fs::metadata(path)?.modified()?;
    let since_epoch = current.duration_since(UNIX_EPOCH)? + Duration::from_secs(secs);
    filetime::set_file_mtime(
        path,
        FileTime::from_unix_time(since_epoch.as_secs() as i64, since_epoch.subsec_nanos()),
    )?;
    Ok(())
}
