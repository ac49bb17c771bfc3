// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Head and upstream resolution.
//!
//! ```text
//! head_name()      rev-parse --abbrev-ref HEAD
//!                    "HEAD" / MissingHead  --> DetachedOrMissingHead
//! upstream_name()  rev-parse --abbrev-ref --symbolic-full-name @{u}
//!                    NoUpstream            --> NoUpstreamConfigured
//!                    MissingHead           --> NoUpstreamConfigured
//!                      (upstream set, remote-tracking ref absent)
//! remote_of()      config --get branch.<name>.remote, else default
//! ```

use super::backend::{GitRunner, describe, git_args};
use super::diagnostics::{GitCondition, translate_stderr};
use crate::error::{GitError, SyncResult};

/// Returns the short name of the checked-out branch.
///
/// # Errors
///
/// `DetachedOrMissingHead` for a detached or unborn HEAD; the process error
/// for any other failure.
pub fn head_name(git: &impl GitRunner) -> SyncResult<String> {
    let args = git_args(["rev-parse", "--abbrev-ref", "HEAD"]);
    let output = git.capture(&args)?;

    if !output.success() {
        return match translate_stderr(output.stderr()) {
            Some(GitCondition::MissingHead) => Err(GitError::DetachedOrMissingHead.into()),
            _ => Err(output.failure(&describe(&args)).into()),
        };
    }

    let name = output.stdout_text();
    if name.is_empty() || name == "HEAD" {
        return Err(GitError::DetachedOrMissingHead.into());
    }
    Ok(name.into_owned())
}

/// Returns the upstream of `branch` as `<remote>/<branch>`.
///
/// # Errors
///
/// `NoUpstreamConfigured` when git reports no upstream, which callers treat
/// as a separate path rather than a failure. An upstream whose
/// remote-tracking ref does not exist yet (never fetched, or pruned) is
/// reported the same way: there is nothing to compare against.
pub fn upstream_name(git: &impl GitRunner, branch: &str) -> SyncResult<String> {
    let args = git_args(["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]);
    let output = git.capture(&args)?;

    if !output.success() {
        return match translate_stderr(output.stderr()) {
            Some(GitCondition::NoUpstream | GitCondition::MissingHead) => {
                Err(GitError::NoUpstreamConfigured {
                    branch: branch.to_string(),
                }
                .into())
            }
            None => Err(output.failure(&describe(&args)).into()),
        };
    }

    let upstream = output.stdout_text();
    if upstream.is_empty() {
        return Err(GitError::NoUpstreamConfigured {
            branch: branch.to_string(),
        }
        .into());
    }
    Ok(upstream.into_owned())
}

/// Returns the remote `branch` tracks, or `default` when none is configured.
///
/// # Errors
///
/// Only if git cannot be run.
pub fn remote_of(git: &impl GitRunner, branch: &str, default: &str) -> SyncResult<String> {
    let key = format!("branch.{branch}.remote");
    let output = git.capture(&git_args(["config", "--get", key.as_str()]))?;

    let remote = output.stdout_text();
    if output.success() && !remote.is_empty() {
        Ok(remote.into_owned())
    } else {
        tracing::debug!(branch, default, "no remote configured, using default");
        Ok(default.to_string())
    }
}
