//! Wrappers around the Apache command line utilities.
//!
//! Nothing here spawns a process directly: every wrapper is handed a
//! [`CommandRunner`], and [`ProcessRunner`] is the implementation used by
//! the binary.

pub mod apache;
pub mod debian;
pub mod suse;

pub use apache::*;
pub use debian::*;

use std::fmt;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// A program and its arguments, never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Everything a finished command produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub retcode: i32,
    pub stdout: String,
    pub stderr: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run and return stdout
    fn run(&self, command: &CommandLine) -> Result<String>;

    /// Run and return exit code, stdout and stderr
    fn run_all(&self, command: &CommandLine) -> Result<CommandOutput>;

    /// Run and return only the exit code
    fn retcode(&self, command: &CommandLine) -> Result<i32>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandLine) -> Result<String> {
        (**self).run(command)
    }

    fn run_all(&self, command: &CommandLine) -> Result<CommandOutput> {
        (**self).run_all(command)
    }

    fn retcode(&self, command: &CommandLine) -> Result<i32> {
        (**self).retcode(command)
    }
}

/// Runs commands as child processes and waits for them
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<String> {
        Ok(self.run_all(command)?.stdout)
    }

    fn run_all(&self, command: &CommandLine) -> Result<CommandOutput> {
        debug!(%command, "running");
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.to_string(),
                source,
            })?;

        let retcode = output.status.code().ok_or_else(|| Error::UnexpectedOutput {
            command: command.to_string(),
            detail: "terminated by a signal".to_string(),
        })?;
        debug!(%command, retcode, "finished");

        Ok(CommandOutput {
            retcode,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn retcode(&self, command: &CommandLine) -> Result<i32> {
        Ok(self.run_all(command)?.retcode)
    }
}
