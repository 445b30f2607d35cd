// src/watch/detector.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, trace};

use crate::watch::collector::PathCollector;

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No watched file moved forward in time.
    Unchanged,
    /// This file's modification time advanced; the cycle stopped here.
    Changed(PathBuf),
}

/// Polling change detector.
///
/// Owns the timestamp cache (path -> last observed modification time). Only
/// the owner's own [`poll`](Self::poll) touches the cache, and entries are
/// never evicted: a path that drops out of the WatchSet simply stops being
/// checked.
#[derive(Debug)]
pub struct ChangeDetector {
    collector: PathCollector,
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl ChangeDetector {
    pub fn new(collector: PathCollector) -> Self {
        Self {
            collector,
            mtimes: HashMap::new(),
        }
    }

    pub fn collector(&self) -> &PathCollector {
        &self.collector
    }

    /// Run the first cycle, which can only record baselines.
    ///
    /// Returns the number of files now tracked.
    pub fn seed_baseline(&mut self) -> usize {
        let outcome = self.poll();
        debug_assert_eq!(outcome, PollOutcome::Unchanged);
        debug!(tracked = self.mtimes.len(), "baseline modification times recorded");
        self.mtimes.len()
    }

    /// Recompute the WatchSet and compare every file against the cache.
    ///
    /// - A path seen for the first time only records its baseline.
    /// - A path whose modification time is strictly later than the cached
    ///   one ends the cycle with [`PollOutcome::Changed`]. The cached value
    ///   is left as it was.
    /// - Files that cannot be stat'd are skipped for this cycle.
    pub fn poll(&mut self) -> PollOutcome {
        let watch_set = self.collector.collect();
        let fs = self.collector.fs();

        for path in watch_set {
            let Ok(mtime) = fs.modified(&path) else {
                trace!(?path, "cannot stat watched file; skipping");
                continue;
            };

            match self.mtimes.get(&path) {
                None => {
                    self.mtimes.insert(path, mtime);
                }
                Some(&previous) if mtime > previous => {
                    debug!(?path, "modification time advanced");
                    return PollOutcome::Changed(path);
                }
                Some(_) => {}
            }
        }

        PollOutcome::Unchanged
    }

    /// Last cached modification time for `path`.
    pub fn cached(&self, path: &Path) -> Option<SystemTime> {
        self.mtimes.get(path).copied()
    }

    pub fn tracked(&self) -> usize {
        self.mtimes.len()
    }
}
