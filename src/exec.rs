//! Boundary for running trusted external commands.
//!
//! Selector `cmd` checks, the profile editor and the `git` passthrough all go
//! through [`Executor`] so the core only ever sees an exit status.
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context as _, Result};

use crate::error::ContextError;

/// Exit status of a command execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecResult {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Runs external commands on behalf of the engine.
#[cfg_attr(test, mockall::automock)]
pub trait Executor {
    /// Run `command` through the platform shell with captured output and wait
    /// for it to finish.
    ///
    /// Output is captured and discarded so that nothing leaks into the shell
    /// script written by `myenv profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Command`] if the shell cannot be started.
    fn run_shell(&self, command: &str) -> Result<ExecResult, ContextError>;

    /// Run `command` through the platform shell with inherited stdio and wait
    /// for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be started.
    fn run_interactive(&self, command: &str) -> Result<ExecResult>;

    /// Start `program` in `dir` with inherited stdio and return without
    /// waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn spawn_detached(&self, dir: &Path, program: &str, args: &[String]) -> Result<()>;

    /// Check whether `program` is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn shell(command: &str) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl Executor for SystemExecutor {
    fn run_shell(&self, command: &str) -> Result<ExecResult, ContextError> {
        Self::shell(command)
            .stdin(Stdio::null())
            .output()
            .map(|output| ExecResult::from(output.status))
            .map_err(|source| ContextError::Command {
                command: command.to_string(),
                source,
            })
    }

    fn run_interactive(&self, command: &str) -> Result<ExecResult> {
        Self::shell(command)
            .status()
            .map(ExecResult::from)
            .with_context(|| format!("failed to execute: {command}"))
    }

    fn spawn_detached(&self, dir: &Path, program: &str, args: &[String]) -> Result<()> {
        Command::new(program)
            .args(args)
            .current_dir(dir)
            .spawn()
            .with_context(|| format!("failed to execute: {program} in {}", dir.display()))?;
        Ok(())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
