// src/types.rs

//! Protocol constants and the small value types shared by the supervisor and
//! the worker.

/// Exit code a worker uses to ask its supervisor for a fresh worker.
///
/// A workload that legitimately exits with this code is indistinguishable
/// from a reload request.
pub const RELOAD_SENTINEL: i32 = 3;

/// Environment variable marking a process as the worker.
pub const ROLE_ENV_VAR: &str = "reloader_run";

/// The only value of [`ROLE_ENV_VAR`] that selects the worker role.
pub const ROLE_ENV_WORKER_VALUE: &str = "true";

/// Which half of the reload protocol a process image plays.
///
/// Fixed for the lifetime of the process; decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Outer process: launches workers and relays their exit codes.
    Supervisor,
    /// Inner process: runs the workload and the poll loop.
    Worker,
}

impl Role {
    /// Map the raw value of [`ROLE_ENV_VAR`] to a role.
    ///
    /// Only the exact string `"true"` selects the worker; any other value,
    /// or no value at all, selects the supervisor.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(ROLE_ENV_WORKER_VALUE) => Role::Worker,
            _ => Role::Supervisor,
        }
    }

    /// Read the role flag from this process's environment.
    pub fn from_env() -> Self {
        let value = std::env::var(ROLE_ENV_VAR).ok();
        Self::from_env_value(value.as_deref())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Supervisor => "supervisor",
            Role::Worker => "worker",
        }
    }
}

/// How a worker process ended, as seen by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker exited with [`RELOAD_SENTINEL`].
    Reload,
    /// Any other exit; the code becomes the supervisor's own exit code.
    Exit(i32),
}

impl WorkerExit {
    pub fn from_code(code: i32) -> Self {
        if code == RELOAD_SENTINEL {
            WorkerExit::Reload
        } else {
            WorkerExit::Exit(code)
        }
    }

    pub fn code(self) -> i32 {
        match self {
            WorkerExit::Reload => RELOAD_SENTINEL,
            WorkerExit::Exit(code) => code,
        }
    }
}
