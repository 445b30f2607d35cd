// src/supervise/supervisor.rs

use std::fmt;

use tracing::info;

use crate::errors::Result;
use crate::supervise::args::ProcessArgs;
use crate::supervise::launcher::WorkerLauncher;
use crate::types::WorkerExit;

type ArgsSource = Box<dyn Fn() -> Result<ProcessArgs> + Send + Sync>;

/// Outer half of the reload protocol.
///
/// Relaunches the worker for as long as it exits with the reload sentinel;
/// any other exit code ends the loop and is returned verbatim.
pub struct Supervisor<L: WorkerLauncher> {
    launcher: L,
    args: ArgsSource,
    launches: usize,
}

impl<L: WorkerLauncher> fmt::Debug for Supervisor<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("launches", &self.launches)
            .finish_non_exhaustive()
    }
}

impl<L: WorkerLauncher> Supervisor<L> {
    /// Supervisor that relaunches this very program.
    pub fn new(launcher: L) -> Self {
        Self::with_args_source(launcher, ProcessArgs::current)
    }

    /// Supervisor whose worker command line comes from `args`, evaluated
    /// afresh before each launch.
    pub fn with_args_source<F>(launcher: L, args: F) -> Self
    where
        F: Fn() -> Result<ProcessArgs> + Send + Sync + 'static,
    {
        Self {
            launcher,
            args: Box::new(args),
            launches: 0,
        }
    }

    /// Number of workers launched so far.
    pub fn launches(&self) -> usize {
        self.launches
    }

    /// Run workers until one exits with something other than the reload
    /// sentinel, and return that exit code.
    ///
    /// A worker that cannot be spawned ends the loop with an error; there is
    /// no retry.
    pub async fn restart_with_reloader(&mut self) -> Result<i32> {
        loop {
            let args = (self.args)()?;
            self.launches += 1;
            info!(attempt = self.launches, "starting worker");

            match self.launcher.launch(&args).await? {
                WorkerExit::Reload => {
                    info!(attempt = self.launches, "worker requested reload");
                }
                WorkerExit::Exit(code) => {
                    info!(exit_code = code, "worker finished; supervisor exiting");
                    return Ok(code);
                }
            }
        }
    }
}
