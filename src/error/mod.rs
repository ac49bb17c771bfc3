// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             SyncError (~24 bytes)
//!                    |
//!   +--------+-------+-------+
//!   |        |       |       |
//!   v        v       v       v
//! Process   Git    Config  Prompt
//!   Box     Box     Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Process  ExecutableNotFound, SpawnFailed      (tool unavailable)
//!            NonZeroExit, AbnormalTermination      (tool failed)
//!            OutputLimitExceeded, OutputError
//!   Git      BadStatusFormat, MalformedCountOutput (fatal)
//!            DetachedOrMissingHead,
//!            NoUpstreamConfigured                  (recoverable)
//!            RepoNotFound, BareRepository, Gix
//!   Config   InvalidValue
//!   Prompt   Write, Read
//! ```
//!
//! Glue code (CLI handlers, config loading) uses [`Result`] (anyhow).
//! The workflows return [`SyncResult`] so callers can branch on the
//! recoverable variants.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level error type for the staging and sync workflows.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Running the external tool failed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// The tool ran but its output or state could not be used.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Interactive prompt failed.
    #[error("prompt error: {0}")]
    Prompt(#[from] Box<PromptError>),
}

impl SyncError {
    /// True when the error is [`GitError::NoUpstreamConfigured`].
    #[must_use]
    pub fn is_no_upstream(&self) -> bool {
        matches!(self, Self::Git(e) if matches!(**e, GitError::NoUpstreamConfigured { .. }))
    }

    /// True when the error is [`GitError::DetachedOrMissingHead`].
    #[must_use]
    pub fn is_missing_head(&self) -> bool {
        matches!(self, Self::Git(e) if matches!(**e, GitError::DetachedOrMissingHead))
    }

    /// True when the tool could not be launched at all.
    #[must_use]
    pub fn is_process_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Process(e) if matches!(
                **e,
                ProcessError::ExecutableNotFound { .. } | ProcessError::SpawnFailed { .. }
            )
        )
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    GitError => Git,
    ConfigError => Config,
    PromptError => Prompt,
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("'{command}' exited with code {code}{}", stderr_suffix(.stderr))]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Process was killed by a signal or otherwise ended without an exit code.
    #[error("'{command}' terminated abnormally ({signal})")]
    AbnormalTermination { command: String, signal: String },

    /// Process wrote more to stdout than the capture limit allows.
    #[error("output of '{command}' exceeded {limit} bytes")]
    OutputLimitExceeded { command: String, limit: usize },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

// --- Git Errors ---

/// Git state and output interpretation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not inside a git work tree.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository): {path}")]
    BareRepository { path: String },

    /// Repository discovery failed inside gix.
    #[error("failed to discover repository: {0}")]
    Gix(#[from] Box<gix::discover::Error>),

    /// The porcelain status report did not match the expected layout.
    #[error("malformed status output at byte {offset}: {reason}")]
    BadStatusFormat { offset: usize, reason: &'static str },

    /// HEAD does not name a branch (detached, or unborn with no commits).
    #[error("HEAD is detached or does not point to a commit")]
    DetachedOrMissingHead,

    /// The current branch has no upstream configured.
    #[error("no upstream configured for branch '{branch}'")]
    NoUpstreamConfigured { branch: String },

    /// `rev-list --left-right --count` output could not be parsed.
    #[error("unexpected ahead/behind output: {output:?}")]
    MalformedCountOutput { output: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Prompt Errors ---

/// Errors from the interactive confirmation step.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Writing the question failed.
    #[error("failed to write prompt: {0}")]
    Write(#[source] std::io::Error),

    /// Reading the answer failed.
    #[error("failed to read answer: {0}")]
    Read(#[source] std::io::Error),
}
