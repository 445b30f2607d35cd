// src/supervise/launcher.rs

//! Pluggable worker launcher.
//!
//! The supervisor talks to a `WorkerLauncher` instead of spawning processes
//! itself, so tests can script worker exit codes without real processes.
//!
//! - `ProcessLauncher` is the production implementation. It spawns the
//!   worker with `tokio::process::Command` and sets the role flag. Then it
//!   waits for either the worker's exit or a termination signal aimed at
//!   the supervisor; on a signal the worker is killed first.

use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{ReloaderError, Result};
use crate::supervise::args::ProcessArgs;
use crate::supervise::signals::TerminationSignals;
use crate::types::{ROLE_ENV_VAR, ROLE_ENV_WORKER_VALUE, WorkerExit};

/// Trait abstracting how one worker generation is run to completion.
pub trait WorkerLauncher: Send {
    /// Start a worker with `args` and wait until it exits.
    ///
    /// Failing to start the worker at all is an error; any exit, whatever
    /// its code, is an `Ok`.
    fn launch<'a>(
        &'a mut self,
        args: &'a ProcessArgs,
    ) -> Pin<Box<dyn Future<Output = Result<WorkerExit>> + Send + 'a>>;
}

/// Launches the worker as a child process.
///
/// The child inherits the environment (plus the role flag), the working
/// directory and all standard streams. SIGTERM or Ctrl-C delivered to the
/// supervisor kills the running worker, and the launch then reports a clean
/// exit so the supervisor ends with code 0.
#[derive(Debug, Default)]
pub struct ProcessLauncher {
    signals: Option<TerminationSignals>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the signal listener once; later launches reuse it so a
    /// signal that lands between two generations is not lost.
    fn signals(&mut self) -> Result<&mut TerminationSignals> {
        let signals = match self.signals.take() {
            Some(signals) => signals,
            None => TerminationSignals::listen()?,
        };
        Ok(self.signals.insert(signals))
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn launch<'a>(
        &'a mut self,
        args: &'a ProcessArgs,
    ) -> Pin<Box<dyn Future<Output = Result<WorkerExit>> + Send + 'a>> {
        Box::pin(async move {
            let signals = self.signals()?;
            debug!(program = ?args.program(), args = ?args.args(), "spawning worker");

            let mut child = Command::new(args.program())
                .args(args.args())
                .env(ROLE_ENV_VAR, ROLE_ENV_WORKER_VALUE)
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| ReloaderError::SpawnError {
                    program: args.program().to_path_buf(),
                    source,
                })?;

            tokio::select! {
                status = child.wait() => {
                    let code = exit_code(status?);
                    info!(exit_code = code, "worker exited");
                    Ok(WorkerExit::from_code(code))
                }
                signal = signals.recv() => {
                    info!(signal, pid = ?child.id(), "termination requested; killing worker");
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "failed to kill worker process");
                    }
                    Ok(WorkerExit::Exit(0))
                }
            }
        })
    }
}

/// Numeric exit code for `status`.
///
/// A worker killed by a signal reports `128 + signal` on unix, the shell
/// convention; elsewhere 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
