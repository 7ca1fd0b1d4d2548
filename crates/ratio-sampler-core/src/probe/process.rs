use crate::error::{Error, Result};
use std::ffi::OsString;
use std::process::Command;
use tracing::debug;

/// Captured result of one finished external process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion and captures its output.
///
/// Implementations block until the process exits.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<ProcessOutput>;
}

/// Runs real processes via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<ProcessOutput> {
        debug!("Running {}", command_line(program, args));
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|err| Error::ExternalTool {
                command: command_line(program, args),
                status: "failed to start".to_string(),
                stderr: err.to_string(),
            })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Printable form of a command, quoting arguments that contain spaces.
pub fn command_line(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        let arg = arg.to_string_lossy();
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(&arg);
            line.push('"');
        } else {
            line.push_str(&arg);
        }
    }
    line
}
