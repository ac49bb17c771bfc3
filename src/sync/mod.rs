// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit and upstream reconciliation.
//!
//! ```text
//! commit(message?)
//!   |
//!   v
//! validate_index() -- HasConflicts --> Conflicts (no commit)
//!   |             \-- Clean -------> behind only? fast-forward : NothingToCommit
//!   v ReadyToCommit
//! head_name() ------ detached/unborn --> commit --> CommittedWithoutBranch
//!   |
//! upstream_name() -- none ------------> commit --> CommittedWithoutUpstream
//!   |
//! commit --> fetch (best-effort) --> rev-list --left-right --count
//!   |
//!   v
//!  ahead  behind
//!   0      0     UpToDate
//!  >0      0     Ahead
//!   0     >0     merge --ff-only, recount --> FastForwarded | StillBehind
//!  >0     >0     Diverged (left to the operator)
//! ```
//!
//! Counts are recomputed for every decision and never cached.

use std::fmt;

use bon::Builder;
use tracing::{debug, info, warn};

use crate::error::{GitError, SyncResult};
use crate::git::backend::{GitRunner, describe, git_args};
use crate::git::refs::{head_name, remote_of, upstream_name};

/// Result of inspecting the index before committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageValidation {
    /// Nothing staged.
    Clean,
    /// Unmerged paths are present.
    HasConflicts,
    /// Staged changes differ from HEAD.
    ReadyToCommit,
}

/// Inspects the index.
///
/// The stat refresh is best-effort; a failure there is only logged.
///
/// # Errors
///
/// Returns a process error if the conflict or staged-diff query fails.
pub fn validate_index(git: &impl GitRunner) -> SyncResult<StageValidation> {
    let refresh = git_args(["update-index", "-q", "--refresh"]);
    match git.capture(&refresh) {
        Ok(output) if !output.success() => {
            debug!(code = output.exit_code(), "index refresh reported changes");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "index refresh failed"),
    }

    let unmerged = git.output(&git_args(["diff", "--name-only", "--diff-filter=U", "-z"]))?;
    if unmerged.iter().any(|&b| b != 0) {
        let count = unmerged.split(|&b| b == 0).filter(|p| !p.is_empty()).count();
        info!(count, "unmerged paths in index");
        return Ok(StageValidation::HasConflicts);
    }

    let staged = git_args(["diff", "--cached", "--quiet"]);
    let output = git.capture(&staged)?;
    match output.exit_code() {
        0 => Ok(StageValidation::Clean),
        1 => Ok(StageValidation::ReadyToCommit),
        _ => Err(output.failure(&describe(&staged)).into()),
    }
}

/// Commits only on the local side (`ahead`) and only on upstream (`behind`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AheadBehind {
    pub ahead: u64,
    pub behind: u64,
}

impl AheadBehind {
    /// Parses `rev-list --left-right --count <upstream>...HEAD` output.
    ///
    /// The left count (upstream side) is `behind`, the right count `ahead`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCountOutput` unless the text is exactly two
    /// non-negative integers.
    pub fn parse(text: &str) -> SyncResult<Self> {
        let malformed = || GitError::MalformedCountOutput {
            output: text.to_string(),
        };

        let mut fields = text.split_whitespace();
        let (Some(behind), Some(ahead), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed().into());
        };
        Ok(Self {
            ahead: ahead.parse().map_err(|_| malformed())?,
            behind: behind.parse().map_err(|_| malformed())?,
        })
    }

    /// Where the branch stands relative to upstream.
    #[must_use]
    pub const fn decision(self) -> SyncDecision {
        match (self.ahead, self.behind) {
            (0, 0) => SyncDecision::UpToDate,
            (_, 0) => SyncDecision::Ahead,
            (0, _) => SyncDecision::FastForward,
            _ => SyncDecision::Diverged,
        }
    }
}

/// Action implied by an [`AheadBehind`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    UpToDate,
    Ahead,
    FastForward,
    Diverged,
}

/// Settings for the remote side of the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SyncOptions {
    /// Refresh remote-tracking refs before counting.
    #[builder(default = true)]
    pub fetch: bool,
    /// Remote used when the branch does not name one.
    #[builder(into, default = "origin".to_string())]
    pub default_remote: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Counts commits between `upstream` and HEAD.
///
/// With `fetch`, `remote` is fetched first; any fetch failure (offline,
/// credentials, missing remote) is logged and the local refs are used.
///
/// # Errors
///
/// Returns a process error if `rev-list` fails and `MalformedCountOutput`
/// if its output cannot be parsed.
pub fn ahead_behind(
    git: &impl GitRunner,
    upstream: &str,
    remote: &str,
    fetch: bool,
) -> SyncResult<AheadBehind> {
    if fetch {
        match git.capture(&git_args(["fetch", "--quiet", remote])) {
            Ok(output) if output.success() => debug!(remote, "fetched"),
            Ok(output) => warn!(remote, stderr = %output.stderr_text(), "fetch failed, using local refs"),
            Err(e) => warn!(remote, error = %e, "fetch failed, using local refs"),
        }
    }

    let range = format!("{upstream}...HEAD");
    let stdout = git.output(&git_args(["rev-list", "--left-right", "--count", range.as_str()]))?;
    let counts = AheadBehind::parse(&String::from_utf8_lossy(&stdout))?;
    debug!(upstream, ahead = counts.ahead, behind = counts.behind, "counted commits");
    Ok(counts)
}

/// Runs `git merge --ff-only <upstream>`.
///
/// # Errors
///
/// Returns `NonZeroExit` when the merge is not a fast-forward.
pub fn fast_forward(git: &impl GitRunner, upstream: &str) -> SyncResult<()> {
    git.run(&git_args(["merge", "--ff-only", "--quiet", upstream]))
}

/// Terminal state of [`commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Unmerged paths; nothing was committed.
    Conflicts,
    /// Nothing staged and nothing to pull.
    NothingToCommit,
    /// Nothing staged; the branch was fast-forwarded to upstream.
    Synced { upstream: String },
    /// Committed, but HEAD is detached or was unborn.
    CommittedWithoutBranch,
    /// Committed; the branch has no upstream.
    CommittedWithoutUpstream { branch: String },
    /// Committed; upstream had nothing new.
    UpToDate { upstream: String },
    /// Committed; local commits are waiting to be pushed.
    Ahead { branch: String, upstream: String, ahead: u64 },
    /// Committed and fast-forwarded to upstream.
    FastForwarded { upstream: String },
    /// Fast-forward attempted but upstream is still ahead.
    StillBehind { upstream: String, behind: u64 },
    /// Committed; local and upstream both have unique commits.
    Diverged {
        branch: String,
        upstream: String,
        ahead: u64,
        behind: u64,
    },
}

impl CommitOutcome {
    /// True when a commit was created.
    #[must_use]
    pub const fn committed(&self) -> bool {
        !matches!(
            self,
            Self::Conflicts | Self::NothingToCommit | Self::Synced { .. }
        )
    }
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflicts => f.write_str("resolve conflicts before committing"),
            Self::NothingToCommit => f.write_str("nothing to commit"),
            Self::Synced { upstream } => {
                write!(f, "nothing to commit; fast-forwarded to {upstream}")
            }
            Self::CommittedWithoutBranch => {
                f.write_str("committed; HEAD is not on a branch, nothing to sync")
            }
            Self::CommittedWithoutUpstream { branch } => {
                write!(f, "committed on {branch}; no upstream configured")
            }
            Self::UpToDate { upstream } => {
                write!(f, "committed on top of up-to-date {upstream}")
            }
            Self::Ahead {
                branch,
                upstream,
                ahead,
            } => write!(f, "committed; {branch} is ahead of {upstream} by {ahead} commit(s)"),
            Self::FastForwarded { upstream } => {
                write!(f, "committed and fast-forwarded to {upstream}; up to date")
            }
            Self::StillBehind { upstream, behind } => write!(
                f,
                "still behind {upstream} by {behind} commit(s); retry or resolve manually"
            ),
            Self::Diverged {
                branch,
                upstream,
                ahead,
                behind,
            } => write!(
                f,
                "committed; {branch} has diverged from {upstream} ({ahead} ahead, {behind} behind)"
            ),
        }
    }
}

/// Commits with `message`, or through the editor when `None`.
fn create_commit(git: &impl GitRunner, message: Option<&str>) -> SyncResult<()> {
    match message {
        Some(message) => git.run(&git_args(["commit", "--quiet", "-m", message])),
        None => git.run_interactive(&git_args(["commit"])),
    }
}

/// Fast-forwards and recounts; returns commits still missing locally.
fn fast_forward_and_recount(
    git: &impl GitRunner,
    upstream: &str,
    remote: &str,
) -> SyncResult<u64> {
    if let Err(e) = fast_forward(git, upstream) {
        if e.is_process_unavailable() {
            return Err(e);
        }
        warn!(upstream, error = %e, "fast-forward failed");
    }
    Ok(ahead_behind(git, upstream, remote, false)?.behind)
}

/// Branch name and upstream, or `None` when either is missing.
fn tracking(git: &impl GitRunner) -> SyncResult<Option<(String, String)>> {
    let branch = match head_name(git) {
        Ok(branch) => branch,
        Err(e) if e.is_missing_head() => return Ok(None),
        Err(e) => return Err(e),
    };
    match upstream_name(git, &branch) {
        Ok(upstream) => Ok(Some((branch, upstream))),
        Err(e) if e.is_no_upstream() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Nothing staged: pull in upstream commits when that is a fast-forward.
fn sync_clean(git: &impl GitRunner, opts: &SyncOptions) -> SyncResult<CommitOutcome> {
    let Some((branch, upstream)) = tracking(git)? else {
        return Ok(CommitOutcome::NothingToCommit);
    };
    let remote = remote_of(git, &branch, &opts.default_remote)?;

    let counts = ahead_behind(git, &upstream, &remote, opts.fetch)?;
    if counts.decision() != SyncDecision::FastForward {
        return Ok(CommitOutcome::NothingToCommit);
    }

    info!(%upstream, behind = counts.behind, "fast-forwarding");
    let behind = fast_forward_and_recount(git, &upstream, &remote)?;
    if behind == 0 {
        Ok(CommitOutcome::Synced { upstream })
    } else {
        Ok(CommitOutcome::StillBehind { upstream, behind })
    }
}

/// Validates, commits, and reconciles the branch with its upstream.
///
/// # Errors
///
/// Returns process errors from git, and `MalformedCountOutput` when the
/// ahead/behind counts cannot be read. Conflicts, a missing upstream, and a
/// detached HEAD are outcomes, not errors.
pub fn commit(
    git: &impl GitRunner,
    message: Option<&str>,
    opts: &SyncOptions,
) -> SyncResult<CommitOutcome> {
    match validate_index(git)? {
        StageValidation::HasConflicts => return Ok(CommitOutcome::Conflicts),
        StageValidation::Clean => return sync_clean(git, opts),
        StageValidation::ReadyToCommit => {}
    }

    let branch = match head_name(git) {
        Ok(branch) => branch,
        Err(e) if e.is_missing_head() => {
            create_commit(git, message)?;
            return Ok(CommitOutcome::CommittedWithoutBranch);
        }
        Err(e) => return Err(e),
    };

    let upstream = match upstream_name(git, &branch) {
        Ok(upstream) => upstream,
        Err(e) if e.is_no_upstream() => {
            create_commit(git, message)?;
            return Ok(CommitOutcome::CommittedWithoutUpstream { branch });
        }
        Err(e) => return Err(e),
    };

    create_commit(git, message)?;
    info!(%branch, "committed");

    let remote = remote_of(git, &branch, &opts.default_remote)?;
    let counts = ahead_behind(git, &upstream, &remote, opts.fetch)?;

    let outcome = match counts.decision() {
        SyncDecision::UpToDate => CommitOutcome::UpToDate { upstream },
        SyncDecision::Ahead => CommitOutcome::Ahead {
            branch,
            upstream,
            ahead: counts.ahead,
        },
        SyncDecision::FastForward => {
            info!(%upstream, behind = counts.behind, "fast-forwarding");
            match fast_forward_and_recount(git, &upstream, &remote)? {
                0 => CommitOutcome::FastForwarded { upstream },
                behind => CommitOutcome::StillBehind { upstream, behind },
            }
        }
        SyncDecision::Diverged => CommitOutcome::Diverged {
            branch,
            upstream,
            ahead: counts.ahead,
            behind: counts.behind,
        },
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests;
