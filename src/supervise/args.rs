// src/supervise/args.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::errors::Result;
use crate::watch::absolutize;

/// Argument vector that re-launches the current program identically.
///
/// Recomputed from process state before every launch; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessArgs {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessArgs {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `[current executable, args...]` as this process was started.
    pub fn current() -> Result<Self> {
        let program = std::env::current_exe().context("resolving current executable")?;
        Ok(Self::new(program, std::env::args_os().skip(1)))
    }

    /// `[interpreter, absolute script path, args...]` for targets run through
    /// an interpreter.
    pub fn for_script<I, S>(interpreter: impl Into<PathBuf>, script: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut all: Vec<OsString> = vec![absolutize(script).into_os_string()];
        all.extend(args.into_iter().map(Into::into));
        Self::new(interpreter, all)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The full vector, program first.
    pub fn to_vec(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
