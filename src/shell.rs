//! Shell command execution used by the service supervisor.
use std::{io, process::Command};

use tracing::debug;

use crate::constants::{DEFAULT_SHELL, SHELL_COMMAND_FLAG};

/// Captured result of a shell command. Only stdout is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Exit code, if the command was not killed by a signal.
    pub code: Option<i32>,
    /// Everything the command wrote to stdout.
    pub stdout: String,
}

impl CommandOutput {
    /// Returns true when stdout holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.stdout.trim().is_empty()
    }

    /// Describes a failed run for error messages.
    pub fn failure(&self) -> io::Error {
        match self.code {
            Some(code) => io::Error::other(format!("command exited with status {code}")),
            None => io::Error::other("command terminated by signal"),
        }
    }
}

/// Runs command strings. Implemented by [`ShellRunner`] and by test fakes.
pub trait CommandRunner {
    /// Runs `command` to completion and captures its stdout.
    fn run(&self, command: &str) -> io::Result<CommandOutput>;
}

/// Runs commands through `sh -c`, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<CommandOutput> {
        debug!("Running `{command}` via {DEFAULT_SHELL}");
        let output = Command::new(DEFAULT_SHELL)
            .arg(SHELL_COMMAND_FLAG)
            .arg(command)
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
