// src/watch/mod.rs

//! File discovery and change detection.
//!
//! This module is responsible for:
//! - Enumerating the files to watch from the loaded modules and the module
//!   search path (`collector`, `inventory`, `ignore`).
//! - Detecting modification-time advances by interval polling (`detector`).
//! - Summarising large path sets by their common roots (`roots`).
//!
//! It does **not** know about processes; turning a detected change into a
//! restart is the job of `supervise`.

pub mod collector;
pub mod detector;
pub mod ignore;
pub mod inventory;
pub mod roots;

pub use collector::{
    DEFAULT_SOURCE_EXTENSIONS, PathCollector, SourceFilter, WatchSet, absolutize,
    resolve_backing_file,
};
pub use detector::{ChangeDetector, PollOutcome};
pub use ignore::{IGNORED_DIR_NAMES, IgnoreRules, toolchain_prefixes};
pub use inventory::{
    ModuleInventory, ModuleRecord, ProcessImageInventory, SearchPathProvider, StaticInventory,
    StaticSearchPath, mapped_files,
};
pub use roots::find_common_roots;
