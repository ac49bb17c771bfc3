// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git runner abstraction.
//!
//! ```text
//! GitRunner (trait)
//!   capture()          ALLOW_FAILURE, stdout+stderr kept
//!   run()              stdout discarded, non-zero is an error
//!   run_interactive()  terminal handed to git (editor commits)
//!   output()           capture() + require exit 0
//!        |
//!        v
//!   ShellGit --> ProcessBuilder --> git (pinned cwd)
//! ```

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::core::process::builder::{
    DEFAULT_CAPTURE_LIMIT, ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags,
};
use crate::error::SyncResult;

/// Builds a git argument vector from anything string-like.
pub fn git_args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_os_string())
        .collect()
}

/// Renders an argument vector as `git <args>` for logs and errors.
#[must_use]
pub fn describe(args: &[OsString]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Executes git commands inside one working tree.
///
/// Implementors pin the working directory; callers pass only arguments.
pub trait GitRunner {
    /// Runs git and returns its output whatever the exit code.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git cannot be launched, terminates
    /// abnormally, or overflows the capture limit.
    fn capture(&self, args: &[OsString]) -> SyncResult<ProcessOutput>;

    /// Runs git discarding stdout.
    ///
    /// # Errors
    ///
    /// As [`GitRunner::capture`], plus `NonZeroExit` (with stderr) on failure.
    fn run(&self, args: &[OsString]) -> SyncResult<()>;

    /// Runs git attached to the terminal (stdin/stdout/stderr inherited).
    ///
    /// # Errors
    ///
    /// As [`GitRunner::run`]; stderr is not captured.
    fn run_interactive(&self, args: &[OsString]) -> SyncResult<()>;

    /// Runs git and returns stdout, requiring exit code 0.
    ///
    /// # Errors
    ///
    /// As [`GitRunner::run`].
    fn output(&self, args: &[OsString]) -> SyncResult<Vec<u8>> {
        let output = self.capture(args)?;
        Ok(output.ensure_success(&describe(args))?.into_stdout())
    }
}

impl<T: GitRunner + ?Sized> GitRunner for &T {
    fn capture(&self, args: &[OsString]) -> SyncResult<ProcessOutput> {
        (**self).capture(args)
    }

    fn run(&self, args: &[OsString]) -> SyncResult<()> {
        (**self).run(args)
    }

    fn run_interactive(&self, args: &[OsString]) -> SyncResult<()> {
        (**self).run_interactive(args)
    }
}

// --- ShellGit Implementation (Git CLI) ---

/// Git backend that spawns the git executable.
///
/// Non-interactive calls set `GIT_TERMINAL_PROMPT=0` and `GCM_INTERACTIVE=never`
/// so a fetch needing credentials fails instead of hanging, and `LC_ALL=C` so
/// stderr stays in the wording `diagnostics` expects.
#[derive(Debug, Clone)]
pub struct ShellGit {
    program: PathBuf,
    worktree: PathBuf,
    capture_limit: usize,
}

impl ShellGit {
    /// Resolves `program` via PATH and pins commands to `worktree`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the program cannot be found.
    pub fn new(program: impl AsRef<OsStr>, worktree: impl AsRef<Path>) -> SyncResult<Self> {
        let builder = ProcessBuilder::which(program)?;
        Ok(Self {
            program: builder.program().clone(),
            worktree: worktree.as_ref().to_path_buf(),
            capture_limit: DEFAULT_CAPTURE_LIMIT,
        })
    }

    /// Sets the per-stream capture limit.
    #[must_use]
    pub const fn with_capture_limit(mut self, bytes: usize) -> Self {
        self.capture_limit = bytes;
        self
    }

    fn builder(&self, args: &[OsString]) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .name("git")
            .args(args)
            .cwd(&self.worktree)
            .capture_limit(self.capture_limit)
    }

    fn batch(&self, args: &[OsString]) -> ProcessBuilder {
        self.builder(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .env("LC_ALL", "C")
    }
}

impl GitRunner for ShellGit {
    fn capture(&self, args: &[OsString]) -> SyncResult<ProcessOutput> {
        self.batch(args)
            .capture_stdout()
            .stderr_flags(StreamFlags::KEEP_IN_BUFFER | StreamFlags::FORWARD_TO_LOG)
            .flag(ProcessFlags::ALLOW_FAILURE)
            .run()
    }

    fn run(&self, args: &[OsString]) -> SyncResult<()> {
        self.batch(args).discard_stdout().run().map(drop)
    }

    fn run_interactive(&self, args: &[OsString]) -> SyncResult<()> {
        self.builder(args).inherit_stdio().run().map(drop)
    }
}
