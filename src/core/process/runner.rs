// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and exit-status mapping.
//!
//! ```text
//! run()
//!   |
//!   v
//! build_command()   args, cwd, env, stdio
//!   |
//!   v
//! spawn() ---- NotFound ----> ExecutableNotFound
//!   |     ---- other -------> SpawnFailed
//!   v
//! collect_output() + wait()
//!   |
//!   v
//! ExitStatus
//!   Exited(0)  --> ProcessOutput
//!   Exited(n)  --> NonZeroExit (unless ALLOW_FAILURE)
//!   signal     --> AbnormalTermination
//! ```

use std::fmt::Write as _;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use super::io::{collect_output, forward_to_log};
use crate::error::{ProcessError, SyncResult};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the command line as a string (for logging and errors).
    pub(crate) fn command_line(&self) -> String {
        let mut cmd = self.display_name();
        for arg in self.args_slice() {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and blocks until it exits.
    ///
    /// Output buffers are owned by the returned [`ProcessOutput`]; on every
    /// error path they are dropped before returning.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if:
    /// - The executable cannot be launched (`ExecutableNotFound`, `SpawnFailed`).
    /// - Reading a pipe or waiting for the child fails (`OutputError`).
    /// - Stdout exceeds the capture limit (`OutputLimitExceeded`).
    /// - The child ends without an exit code (`AbnormalTermination`).
    /// - The exit code is non-zero and `ALLOW_FAILURE` is not set (`NonZeroExit`).
    pub fn run(self) -> SyncResult<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self.build_command().spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program().display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                }
            }
        })?;
        trace!(process = %name, pid = child.id(), "spawned");

        // Always reap the child, even if a pipe read failed.
        let captured = collect_output(&mut child, self.limit());
        let status = child.wait();

        let output_error = |e: std::io::Error| ProcessError::OutputError {
            command: cmd_line.clone(),
            message: e.to_string(),
        };
        let (stdout, stderr) = captured.map_err(output_error)?;
        let status = status.map_err(output_error)?;

        if stdout.truncated {
            return Err(ProcessError::OutputLimitExceeded {
                command: cmd_line,
                limit: self.limit(),
            }
            .into());
        }
        if stderr.truncated {
            warn!(process = %name, limit = self.limit(), "stderr truncated");
        }

        forward_to_log(&name, "stdout", self.stdout_config(), &stdout.bytes);
        forward_to_log(&name, "stderr", self.stderr_config(), &stderr.bytes);

        let Some(code) = status.code() else {
            return Err(ProcessError::AbnormalTermination {
                command: cmd_line,
                signal: describe_abnormal(status),
            }
            .into());
        };

        let output = ProcessOutput::new(code, stdout.bytes, stderr.bytes);
        if self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) {
            trace!(process = %name, exit_code = code, "completed");
            return Ok(output);
        }

        if !output.success() {
            debug!(process = %name, stderr = %output.stderr_text(), "process error output");
        }
        let output = output.ensure_success(&cmd_line)?;
        trace!(process = %name, exit_code = code, "completed");
        Ok(output)
    }

    /// Builds the std Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        for (key, value) in self.env_overrides() {
            command.env(key, value);
        }

        // Never block on stdin unless the terminal is handed over.
        if self.stdout_config().contains(StreamFlags::INHERIT) {
            command.stdin(Stdio::inherit());
        } else {
            command.stdin(Stdio::null());
        }
        command.stdout(Self::stdio_from_flags(self.stdout_config()));
        command.stderr(Self::stdio_from_flags(self.stderr_config()));

        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::INHERIT) {
            Stdio::inherit()
        } else if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}

#[cfg(unix)]
fn describe_abnormal(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    if let Some(signal) = status.signal() {
        format!("killed by signal {signal}")
    } else if let Some(signal) = status.stopped_signal() {
        format!("stopped by signal {signal}")
    } else {
        "no exit code".to_string()
    }
}

#[cfg(not(unix))]
fn describe_abnormal(_status: ExitStatus) -> String {
    "no exit code".to_string()
}
