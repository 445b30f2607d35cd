use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use reloader::errors::{ReloaderError, Result};
use reloader::supervise::{ProcessArgs, WorkerLauncher};
use reloader::types::WorkerExit;

/// One scripted worker generation.
#[derive(Debug, Clone, Copy)]
pub enum FakeRun {
    /// The worker runs and exits with this code.
    Exit(i32),
    /// The worker cannot be spawned.
    SpawnFailure,
}

/// A fake launcher that:
/// - records the arguments of every launch
/// - replays a scripted list of exit codes instead of running processes.
///
/// Running past the end of the script is a test bug and panics.
pub struct FakeLauncher {
    script: VecDeque<FakeRun>,
    launched: Arc<Mutex<Vec<ProcessArgs>>>,
}

impl FakeLauncher {
    pub fn new(script: impl IntoIterator<Item = FakeRun>) -> Self {
        Self {
            script: script.into_iter().collect(),
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Launcher whose workers exit with `codes`, in order.
    pub fn exiting_with(codes: impl IntoIterator<Item = i32>) -> Self {
        Self::new(codes.into_iter().map(FakeRun::Exit))
    }

    /// Shared handle on the recorded launches.
    pub fn launched(&self) -> Arc<Mutex<Vec<ProcessArgs>>> {
        Arc::clone(&self.launched)
    }
}

impl WorkerLauncher for FakeLauncher {
    fn launch<'a>(
        &'a mut self,
        args: &'a ProcessArgs,
    ) -> Pin<Box<dyn Future<Output = Result<WorkerExit>> + Send + 'a>> {
        Box::pin(async move {
            self.launched.lock().unwrap().push(args.clone());

            match self.script.pop_front() {
                Some(FakeRun::Exit(code)) => Ok(WorkerExit::from_code(code)),
                Some(FakeRun::SpawnFailure) => Err(ReloaderError::SpawnError {
                    program: args.program().to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
                }),
                None => panic!("FakeLauncher script exhausted"),
            }
        })
    }
}
