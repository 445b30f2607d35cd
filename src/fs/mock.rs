// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};

use super::FileSystem;

/// Mirrors the kernel's limit on links followed while resolving one path.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir(Vec<String>), // List of child names
    Symlink(PathBuf),
}

type Entries = HashMap<PathBuf, MockEntry>;

/// In-memory filesystem with settable modification times and symlinks.
///
/// Paths are taken verbatim; tests should use absolute paths such as
/// `/project/src/app.py`. Parent directories are created implicitly.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<Entries>>,
}

/// Convert whole seconds since the epoch into a `SystemTime`.
pub fn mtime(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file with modification time 0.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.add_file_with_mtime(path, 0);
    }

    pub fn add_file_with_mtime(&self, path: impl AsRef<Path>, secs: u64) {
        let path = path.as_ref();
        let mut entries = self.lock();
        entries.insert(
            path.to_path_buf(),
            MockEntry::File {
                modified: mtime(secs),
            },
        );
        link_into_parent(&mut entries, path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        entries
            .entry(path.to_path_buf())
            .or_insert_with(|| MockEntry::Dir(Vec::new()));
        link_into_parent(&mut entries, path);
    }

    /// Create `link` pointing at `target`. A relative target is taken
    /// relative to the link's directory, as on a real filesystem.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl Into<PathBuf>) {
        let link = link.as_ref();
        let mut entries = self.lock();
        entries.insert(link.to_path_buf(), MockEntry::Symlink(target.into()));
        link_into_parent(&mut entries, link);
    }

    /// Change the modification time of an existing file, following symlinks.
    pub fn set_modified(&self, path: impl AsRef<Path>, secs: u64) -> Result<()> {
        let path = path.as_ref();
        let mut entries = self.lock();
        let resolved = resolve_links(&entries, path, &mut 0)
            .ok_or_else(|| anyhow!("Too many levels of symbolic links: {:?}", path))?;
        match entries.get_mut(&resolved) {
            Some(MockEntry::File { modified }) => {
                *modified = mtime(secs);
                Ok(())
            }
            Some(_) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    /// Remove a file or link (directories are left in place).
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        if entries.remove(path).is_none() {
            return;
        }
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                let name = name.to_string_lossy();
                children.retain(|c| *c != name);
            }
        }
    }

    /// The entry `path` ends up at once every symlink is followed.
    fn lookup(&self, path: &Path) -> Option<MockEntry> {
        let entries = self.lock();
        let resolved = resolve_links(&entries, path, &mut 0)?;
        entries.get(&resolved).cloned()
    }
}

/// Register `path` in its parent's child list, creating ancestors on the way.
fn link_into_parent(entries: &mut Entries, path: &Path) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return;
    };
    if parent.as_os_str().is_empty() {
        return;
    }

    let name = name.to_string_lossy().into_owned();
    let created = !entries.contains_key(parent);
    let slot = entries
        .entry(parent.to_path_buf())
        .or_insert_with(|| MockEntry::Dir(Vec::new()));
    if let MockEntry::Dir(children) = slot {
        if !children.contains(&name) {
            children.push(name);
        }
    }

    if created {
        link_into_parent(entries, parent);
    }
}

/// Follow every symlink along `path`, component by component.
///
/// Returns `None` once more than [`MAX_SYMLINK_HOPS`] links were followed.
fn resolve_links(entries: &Entries, path: &Path, hops: &mut usize) -> Option<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                resolved.pop();
                continue;
            }
            _ => resolved.push(component),
        }
        while let Some(MockEntry::Symlink(target)) = entries.get(&resolved) {
            *hops += 1;
            if *hops > MAX_SYMLINK_HOPS {
                return None;
            }
            let target = match resolved.parent() {
                Some(dir) => dir.join(target),
                None => target.clone(),
            };
            resolved = resolve_links(entries, &target, hops)?;
        }
    }
    Some(resolved)
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lookup(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lookup(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return false;
        };
        let entries = self.lock();
        resolve_links(&entries, parent, &mut 0)
            .is_some_and(|dir| matches!(entries.get(&dir.join(name)), Some(MockEntry::Symlink(_))))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let entries = self.lock();
        let resolved = resolve_links(&entries, path, &mut 0)
            .ok_or_else(|| anyhow!("Too many levels of symbolic links: {:?}", path))?;
        if entries.contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lookup(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.lookup(path) {
            Some(MockEntry::File { modified }) => Ok(modified),
            Some(_) => Ok(UNIX_EPOCH),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
