// src/supervise/worker.rs

//! Inner half of the reload protocol: run the workload next to the poll loop
//! and leave with the reload sentinel once a watched file changes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::supervise::signals::TerminationSignals;
use crate::supervise::terminal::ensure_echo_on;
use crate::types::RELOAD_SENTINEL;
use crate::watch::{ChangeDetector, PathCollector, PollOutcome, absolutize};

/// Default pause between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Worker {
    detector: Arc<Mutex<ChangeDetector>>,
    interval: Duration,
}

impl Worker {
    pub fn new(detector: ChangeDetector, interval: Duration) -> Self {
        Self {
            detector: Arc::new(Mutex::new(detector)),
            interval,
        }
    }

    /// The collector the detector rebuilds its watch set with.
    pub fn collector(&self) -> PathCollector {
        self.detector
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .collector()
            .clone()
    }

    /// Start `workload` and poll until a watched file changes.
    ///
    /// The baseline is recorded before the workload starts, so anything the
    /// workload writes afterwards counts as a change. The workload runs on
    /// its own blocking thread and keeps running while the poll loop works;
    /// if it returns early, polling continues regardless.
    ///
    /// Returns the changed file; callers normally hand it straight to
    /// [`trigger_reload`].
    pub async fn run<F>(self, workload: F) -> PathBuf
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(err) = ensure_echo_on() {
            warn!(error = %err, "could not restore terminal echo");
        }

        let tracked = self
            .with_detector(ChangeDetector::seed_baseline)
            .await
            .unwrap_or_default();
        info!(tracked, interval = ?self.interval, "worker watching for changes");

        let handle = tokio::task::spawn_blocking(workload);
        tokio::spawn(async move {
            match handle.await {
                Ok(()) => info!("workload returned; still watching for changes"),
                Err(err) => error!(error = %err, "workload panicked"),
            }
        });

        self.watch_for_changes().await
    }

    /// Poll, sleep, repeat; return the first file whose modification time
    /// advanced.
    ///
    /// Each poll walks the filesystem, so it runs on the blocking pool and
    /// leaves the runtime threads to the signal handlers and the timer.
    pub async fn watch_for_changes(&self) -> PathBuf {
        loop {
            if let Some(PollOutcome::Changed(path)) = self.with_detector(ChangeDetector::poll).await
            {
                return path;
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run `f` against the detector on the blocking pool.
    ///
    /// A panic inside `f` is re-raised here. `None` means the blocking task
    /// was cancelled, which only happens while the runtime shuts down.
    async fn with_detector<T, F>(&self, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ChangeDetector) -> T + Send + 'static,
    {
        let detector = Arc::clone(&self.detector);
        let task = tokio::task::spawn_blocking(move || {
            let mut detector = detector.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut detector)
        });

        match task.await {
            Ok(value) => Some(value),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                warn!(error = %err, "detector task cancelled");
                None
            }
        }
    }
}

/// Announce the change and exit immediately with the reload sentinel.
///
/// This is a hard exit: the workload and any pending async tasks get no
/// chance to clean up.
pub fn trigger_reload(path: &Path) -> ! {
    let path = absolutize(path);
    info!(path = %path.display(), "change detected; exiting for reload");
    println!("Detected changes in {}, reloading", path.display());
    std::process::exit(RELOAD_SENTINEL)
}

/// Turn SIGTERM and Ctrl-C into an ordinary exit with code 0.
///
/// Worker role only: the supervisor instead watches these signals while it
/// waits on a worker, so it can kill the worker before leaving. Must be
/// called from within a Tokio runtime.
pub fn install_termination_handlers() -> Result<()> {
    let mut signals = TerminationSignals::listen()?;
    tokio::spawn(async move {
        let signal = signals.recv().await;
        info!(signal, "termination signal received; exiting");
        std::process::exit(0);
    });
    Ok(())
}
