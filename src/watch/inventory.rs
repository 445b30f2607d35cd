// src/watch/inventory.rs

//! Read-only views of the process image the collector inspects: which
//! modules are loaded, and which locations make up the module search path.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use tracing::debug;

/// A loaded module and, if known, the file it was loaded from.
///
/// The backing path is best-effort metadata. It may be synthetic, e.g. point
/// inside an archive, in which case the collector resolves it to the nearest
/// existing ancestor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    name: String,
    file: Option<PathBuf>,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, file: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file,
        }
    }

    /// Convenience for a module known to come from `file`.
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, Some(file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backing_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Source of the currently loaded modules.
pub trait ModuleInventory: Send + Sync + Debug {
    fn loaded_modules(&self) -> Vec<ModuleRecord>;
}

/// Source of the module search path: prioritised, deduplicated locations
/// (directories or single files).
pub trait SearchPathProvider: Send + Sync + Debug {
    fn search_path(&self) -> Vec<PathBuf>;
}

/// Fixed module list.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    modules: Vec<ModuleRecord>,
}

impl StaticInventory {
    pub fn new(modules: Vec<ModuleRecord>) -> Self {
        Self { modules }
    }
}

impl ModuleInventory for StaticInventory {
    fn loaded_modules(&self) -> Vec<ModuleRecord> {
        self.modules.clone()
    }
}

/// Modules of the running native process: the executable itself and, on
/// Linux, every file-backed mapping in `/proc/self/maps` (shared libraries).
#[derive(Debug, Clone, Default)]
pub struct ProcessImageInventory;

impl ModuleInventory for ProcessImageInventory {
    fn loaded_modules(&self) -> Vec<ModuleRecord> {
        let mut modules = Vec::new();

        match std::env::current_exe() {
            Ok(exe) => modules.push(ModuleRecord::from_file(exe)),
            Err(err) => debug!(error = %err, "current executable unknown"),
        }

        for file in shared_objects() {
            let record = ModuleRecord::from_file(file);
            if !modules.contains(&record) {
                modules.push(record);
            }
        }

        modules
    }
}

#[cfg(target_os = "linux")]
fn shared_objects() -> Vec<PathBuf> {
    match std::fs::read_to_string("/proc/self/maps") {
        Ok(maps) => mapped_files(&maps),
        Err(err) => {
            debug!(error = %err, "cannot read /proc/self/maps");
            Vec::new()
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn shared_objects() -> Vec<PathBuf> {
    Vec::new()
}

/// Extract the file paths from the text of a `/proc/<pid>/maps` file.
///
/// Anonymous and pseudo mappings (`[heap]`, `[vdso]`, ...) are skipped.
/// Paths are reported in first-seen order without duplicates.
pub fn mapped_files(maps: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for line in maps.lines() {
        // Only the path column can contain '/'.
        let Some(idx) = line.find('/') else {
            continue;
        };
        let path = line[idx..].trim_end();
        let path = path.strip_suffix(" (deleted)").unwrap_or(path);
        let path = PathBuf::from(path);
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

/// Fixed search path. Duplicates are dropped, keeping the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchPath {
    entries: Vec<PathBuf>,
}

impl StaticSearchPath {
    pub fn new<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut deduped: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.into();
            if !deduped.contains(&entry) {
                deduped.push(entry);
            }
        }
        Self { entries: deduped }
    }
}

impl SearchPathProvider for StaticSearchPath {
    fn search_path(&self) -> Vec<PathBuf> {
        self.entries.clone()
    }
}
