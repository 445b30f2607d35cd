// src/supervise/mod.rs

//! The two-process reload protocol.
//!
//! - [`supervisor`] repeatedly launches a worker and interprets its exit
//!   code: the reload sentinel means "launch again", anything else ends the
//!   supervisor with that code.
//! - [`worker`] runs the workload beside the poll loop and exits with the
//!   sentinel on the first detected change.
//! - [`launcher`] abstracts how a worker process is started, so the
//!   supervisor loop can be tested with scripted exits.
//! - [`args`] rebuilds the worker's command line; [`terminal`] restores
//!   terminal echo in a fresh worker.
//! - [`signals`] listens for SIGTERM and Ctrl-C in either role.

pub mod args;
pub mod launcher;
pub mod signals;
pub mod supervisor;
pub mod terminal;
pub mod worker;

pub use args::ProcessArgs;
pub use launcher::{ProcessLauncher, WorkerLauncher, exit_code};
pub use signals::TerminationSignals;
pub use supervisor::Supervisor;
pub use worker::{DEFAULT_POLL_INTERVAL, Worker, install_termination_handlers, trigger_reload};
