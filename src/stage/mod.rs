// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Staging decisions.
//!
//! ```text
//! read_status() --> [ChangeRecord]
//!        |
//!        v
//! classify()            first match wins
//!   ? ?   --> add       untracked
//!   * M   --> add       modified
//!   A *   --> add
//!   * D   --> remove    index only, work tree untouched
//!   R|C * --> add       new name only
//!   else  --> ignored
//!        |
//!        v
//! apply_dotfile_policy()  Ask | Include | Exclude
//!        |
//!        v
//! git add -- <to_add>
//! git rm --cached --quiet -- <to_remove>
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SyncResult;
use crate::git::backend::{GitRunner, git_args};
use crate::git::status::{ChangeRecord, read_status};
use crate::ui::Prompter;

/// Name of the repository metadata directory.
const VCS_DIR: &str = ".git";

/// How dot entries found among the candidates are handled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DotfilePolicy {
    /// Ask once; anything but yes drops them.
    #[default]
    Ask,
    /// Stage them without asking.
    Include,
    /// Drop them without asking.
    Exclude,
}

impl fmt::Display for DotfilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ask => "ask",
            Self::Include => "include",
            Self::Exclude => "exclude",
        })
    }
}

/// What to do with one status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    Add,
    Remove,
}

/// Paths selected for `git add` and for `git rm --cached`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagePlan {
    pub to_add: Vec<PathBuf>,
    pub to_remove: Vec<PathBuf>,
}

impl StagePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Dot entries across both buckets, in bucket order.
    #[must_use]
    pub fn dot_entries(&self) -> Vec<&Path> {
        self.to_add
            .iter()
            .chain(&self.to_remove)
            .map(PathBuf::as_path)
            .filter(|p| is_dot_entry(p))
            .collect()
    }

    fn drop_dot_entries(&mut self) {
        self.to_add.retain(|p| !is_dot_entry(p));
        self.to_remove.retain(|p| !is_dot_entry(p));
    }
}

/// Number of paths handed to `git add` and `git rm --cached`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub added: usize,
    pub removed: usize,
}

impl fmt::Display for StageCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "staged {} path(s), removed {} deleted path(s) from the index",
            self.added, self.removed
        )
    }
}

/// True when `path` is the metadata directory or lies beneath it.
#[must_use]
pub fn is_vcs_metadata(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == VCS_DIR))
}

/// True when the last component of `path` starts with a dot.
///
/// A trailing `/` (how untracked directories are reported) is ignored.
/// Metadata paths are never dot entries.
#[must_use]
pub fn is_dot_entry(path: &Path) -> bool {
    if is_vcs_metadata(path) {
        return false;
    }
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().first() == Some(&b'.'))
}

/// Applies the status code table to one record.
#[must_use]
pub const fn action_for(record: &ChangeRecord) -> Option<StageAction> {
    match (record.x, record.y) {
        ('?', '?') | (_, 'M') | ('A', _) => Some(StageAction::Add),
        (_, 'D') => Some(StageAction::Remove),
        _ if record.is_rename_or_copy() => Some(StageAction::Add),
        _ => None,
    }
}

/// Splits status records into add and remove buckets.
///
/// Only the new name of a rename or copy is staged.
#[must_use]
pub fn classify(records: &[ChangeRecord]) -> StagePlan {
    let mut plan = StagePlan::default();
    for record in records {
        if is_vcs_metadata(&record.path) {
            continue;
        }
        match action_for(record) {
            Some(StageAction::Add) => plan.to_add.push(record.path.clone()),
            Some(StageAction::Remove) => plan.to_remove.push(record.path.clone()),
            None => debug!(path = %record.path.display(), x = %record.x, y = %record.y, "ignored"),
        }
    }
    plan
}

/// Filters dot entries out of `plan` according to `policy`.
///
/// The prompter is only consulted under [`DotfilePolicy::Ask`] and only when
/// at least one dot entry is present.
///
/// # Errors
///
/// Returns `PromptError` if the prompt fails.
pub fn apply_dotfile_policy(
    mut plan: StagePlan,
    policy: DotfilePolicy,
    prompter: &mut impl Prompter,
) -> SyncResult<StagePlan> {
    let dot_entries = plan.dot_entries();
    if dot_entries.is_empty() {
        return Ok(plan);
    }

    let keep = match policy {
        DotfilePolicy::Include => true,
        DotfilePolicy::Exclude => false,
        DotfilePolicy::Ask => {
            let listed = dot_entries
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            prompter.confirm(&format!("Dotfiles detected ({listed}). Stage them?"))?
        }
    };

    if !keep {
        info!(count = dot_entries.len(), "skipping dotfiles");
        plan.drop_dot_entries();
    }
    Ok(plan)
}

fn pathspec_args(head: &[&str], paths: &[PathBuf]) -> Vec<OsString> {
    let mut args = git_args(head);
    args.push("--".into());
    args.extend(paths.iter().map(|p| p.as_os_str().to_os_string()));
    args
}

/// Stages the work tree: status, classify, dotfile policy, add, remove.
///
/// A failing remove does not undo a successful add.
///
/// # Errors
///
/// Returns the first git or prompt failure.
pub fn stage_changes(
    git: &impl GitRunner,
    prompter: &mut impl Prompter,
    policy: DotfilePolicy,
) -> SyncResult<StageCounts> {
    let records = read_status(git)?;
    let plan = apply_dotfile_policy(classify(&records), policy, prompter)?;

    let mut counts = StageCounts::default();
    if !plan.to_add.is_empty() {
        git.run(&pathspec_args(&["add"], &plan.to_add))?;
        counts.added = plan.to_add.len();
        info!(added = counts.added, "staged paths");
    }
    if !plan.to_remove.is_empty() {
        git.run(&pathspec_args(&["rm", "--cached", "--quiet"], &plan.to_remove))?;
        counts.removed = plan.to_remove.len();
        info!(removed = counts.removed, "removed deleted paths from index");
    }
    Ok(counts)
}
