// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod supervise;
pub mod types;
pub mod watch;
pub mod workload;

use std::sync::Arc;

use anyhow::Result;
use tracing::{Instrument, debug, info_span};

use crate::cli::CliArgs;
use crate::config::{Settings, SettingsSources, load_optional};
use crate::fs::{FileSystem, RealFileSystem};
use crate::supervise::{
    ProcessLauncher, Supervisor, Worker, install_termination_handlers, trigger_reload,
};
use crate::types::Role;
use crate::watch::{
    ChangeDetector, IGNORED_DIR_NAMES, IgnoreRules, ModuleInventory, PathCollector,
    ProcessImageInventory, SourceFilter, StaticSearchPath, find_common_roots,
};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - role detection from the environment
/// - config loading + CLI/environment overrides
/// - the supervisor loop or the worker (workload + poll loop)
///
/// Returns the exit code for the process.
pub async fn run(args: CliArgs) -> Result<i32> {
    let role = Role::from_env();

    let (config, config_dir) = load_optional(args.config.as_deref())?;
    let sources = SettingsSources::from_process(config_dir, args.paths.clone(), args.interval)?;
    let settings = Settings::resolve(&config, &sources);
    debug!(?settings, role = role.as_str(), "resolved settings");

    let reloader = Reloader::new(settings);

    if args.dry_run {
        print_dry_run(role, &reloader);
        return Ok(0);
    }

    let heartbeat = args.heartbeat;
    let code = reloader
        .run_with_reload(role, move || workload::heartbeat(heartbeat))
        .instrument(info_span!("reloader", role = role.as_str()))
        .await?;
    Ok(code)
}

/// The reload engine for one process image: settings plus the sources the
/// watch set is computed from.
#[derive(Debug, Clone)]
pub struct Reloader {
    settings: Settings,
    fs: Arc<dyn FileSystem>,
    inventory: Arc<dyn ModuleInventory>,
}

impl Reloader {
    /// Reloader over the real filesystem and this process's loaded images.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fs: Arc::new(RealFileSystem),
            inventory: Arc::new(ProcessImageInventory),
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn ModuleInventory>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn collector(&self) -> PathCollector {
        PathCollector::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.inventory),
            Arc::new(StaticSearchPath::new(self.settings.search_path.clone())),
            IgnoreRules::new(self.settings.runtime_prefixes.clone()),
            SourceFilter::new(self.settings.extensions.clone()),
        )
    }

    pub fn change_detector(&self) -> ChangeDetector {
        ChangeDetector::new(self.collector())
    }

    /// Run `workload` under the reload protocol.
    ///
    /// - As [`Role::Worker`]: start the workload and the poll loop; the
    ///   process exits with the reload sentinel on the first change, so this
    ///   never returns normally.
    /// - As [`Role::Supervisor`]: relaunch this program as a worker until a
    ///   worker exits with a code other than the sentinel, and return that
    ///   code.
    ///
    /// SIGTERM and Ctrl-C end either role with exit code 0. A supervisor
    /// kills its current worker first.
    pub async fn run_with_reload<F>(self, role: Role, workload: F) -> errors::Result<i32>
    where
        F: FnOnce() + Send + 'static,
    {
        match role {
            Role::Worker => {
                install_termination_handlers()?;
                let worker = Worker::new(self.change_detector(), self.settings.interval);
                let changed = worker.run(workload).await;
                trigger_reload(&changed)
            }
            Role::Supervisor => {
                let mut supervisor = Supervisor::new(ProcessLauncher::new());
                supervisor.restart_with_reloader().await
            }
        }
    }
}

/// Simple dry-run output: settings, watch-set size and its common roots.
fn print_dry_run(role: Role, reloader: &Reloader) {
    let settings = reloader.settings();

    println!("reloader dry-run");
    println!("  role = {}", role.as_str());
    println!("  interval = {:?}", settings.interval);
    println!("  extensions = {:?}", settings.extensions);
    println!("  ignored dirs = {:?}", IGNORED_DIR_NAMES);
    println!();

    println!("search path ({}):", settings.search_path.len());
    for entry in &settings.search_path {
        println!("  - {}", entry.display());
    }

    if !settings.runtime_prefixes.is_empty() {
        println!("runtime prefixes ({}):", settings.runtime_prefixes.len());
        for prefix in &settings.runtime_prefixes {
            println!("  - {}", prefix.display());
        }
    }

    let watch_set = reloader.collector().collect();
    let roots = find_common_roots(&watch_set);
    println!();
    println!("watched files: {}", watch_set.len());
    println!("watched roots ({}):", roots.len());
    for root in &roots {
        println!("  - {}", root.display());
    }

    debug!("dry-run complete (nothing started)");
}
