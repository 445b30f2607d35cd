// src/watch/collector.rs

//! Computes the WatchSet: every file whose modification may require a
//! restart of the worker.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::watch::ignore::IgnoreRules;
use crate::watch::inventory::{ModuleInventory, SearchPathProvider};

/// Absolute paths considered in one poll cycle. Rebuilt every cycle.
pub type WatchSet = BTreeSet<PathBuf>;

/// Extensions used when nothing else is configured.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["py", "pyc", "rs"];

/// Which file extensions count as source (or compiled source).
#[derive(Debug, Clone)]
pub struct SourceFilter {
    extensions: Vec<String>,
}

impl SourceFilter {
    /// Extensions are given without the leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSIONS.iter().copied())
    }
}

/// Enumerates the WatchSet from the loaded-module inventory and the module
/// search path.
#[derive(Debug, Clone)]
pub struct PathCollector {
    fs: Arc<dyn FileSystem>,
    inventory: Arc<dyn ModuleInventory>,
    search_path: Arc<dyn SearchPathProvider>,
    rules: IgnoreRules,
    filter: SourceFilter,
}

impl PathCollector {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        inventory: Arc<dyn ModuleInventory>,
        search_path: Arc<dyn SearchPathProvider>,
        rules: IgnoreRules,
        filter: SourceFilter,
    ) -> Self {
        Self {
            fs,
            inventory,
            search_path,
            rules,
            filter,
        }
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    pub fn filter(&self) -> &SourceFilter {
        &self.filter
    }

    /// Compute the WatchSet for the current process image.
    pub fn collect(&self) -> WatchSet {
        let mut watch_set = WatchSet::new();

        for entry in self.search_path.search_path() {
            let entry = absolutize(&entry);
            if self.fs.is_file(&entry) {
                watch_set.insert(entry);
                continue;
            }
            self.walk_search_entry(&entry, &mut watch_set);
        }

        self.collect_module_files(&mut watch_set);

        debug!(watched = watch_set.len(), "collected watch set");
        watch_set
    }

    /// Backing files of loaded modules, resolved to an existing file.
    fn collect_module_files(&self, watch_set: &mut WatchSet) {
        for module in self.inventory.loaded_modules() {
            let Some(file) = module.backing_file() else {
                continue;
            };
            match resolve_backing_file(self.fs.as_ref(), &absolutize(file)) {
                Some(resolved) => {
                    watch_set.insert(resolved);
                }
                None => trace!(module = module.name(), ?file, "module has no backing file"),
            }
        }
    }

    /// Depth-first walk of one search-path directory.
    ///
    /// A directory is only descended into when it or its parent holds source
    /// files, so the walk enters at most one source-free level below the
    /// last source-bearing directory. Symlinked subdirectories are never
    /// entered; the search-path entry itself may be a link.
    fn walk_search_entry(&self, entry: &Path, watch_set: &mut WatchSet) {
        let mut parent_has_source: HashMap<PathBuf, bool> = HashMap::new();
        if let Some(parent) = entry.parent() {
            parent_has_source.insert(parent.to_path_buf(), true);
        }

        let mut stack = vec![entry.to_path_buf()];

        while let Some(dir) = stack.pop() {
            if self.skips_dir(&dir) {
                trace!(?dir, "skipping ignored directory");
                continue;
            }

            // Vanished or unreadable directories are not an error.
            let Ok(children) = self.fs.read_dir(&dir) else {
                continue;
            };

            let mut has_source = false;
            let mut subdirs = Vec::new();
            for child in children {
                if self.fs.is_dir(&child) {
                    if self.fs.is_symlink(&child) {
                        trace!(?child, "not following symlinked directory");
                    } else {
                        subdirs.push(child);
                    }
                } else if self.filter.is_source(&child) {
                    has_source = true;
                    watch_set.insert(child);
                }
            }

            let parent_flag = dir
                .parent()
                .and_then(|p| parent_has_source.get(p))
                .copied()
                .unwrap_or(false);

            if !(has_source || parent_flag) {
                trace!(?dir, "pruning source-free subtree");
                continue;
            }

            parent_has_source.insert(dir, has_source);
            stack.extend(subdirs);
        }
    }

    /// Ignored basename, or a runtime prefix on either the path as written
    /// or the path with its symlinks resolved.
    fn skips_dir(&self, dir: &Path) -> bool {
        if self.rules.skips_dir(dir) {
            return true;
        }
        self.fs
            .canonicalize(dir)
            .is_ok_and(|resolved| self.rules.is_under_runtime_prefix(&resolved))
    }
}

/// Resolve a module's recorded path to an existing file.
///
/// Walks up the ancestors of `path` until an existing file is found (the
/// recorded path may point inside an archive). Returns `None` when the walk
/// hits a directory or the filesystem root first.
pub fn resolve_backing_file(fs: &dyn FileSystem, path: &Path) -> Option<PathBuf> {
    let mut candidate = Some(path);
    while let Some(current) = candidate {
        if fs.is_file(current) {
            return Some(current.to_path_buf());
        }
        if fs.is_dir(current) {
            return None;
        }
        candidate = current.parent().filter(|p| !p.as_os_str().is_empty());
    }
    None
}

/// Make `path` absolute against the current directory without touching the
/// filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
