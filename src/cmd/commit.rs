// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit command.

use anyhow::Context;

use crate::config::Config;
use crate::error::Result;
use crate::git::backend::GitRunner;
use crate::sync::{CommitOutcome, commit};

/// Commits and reconciles with upstream, printing the outcome.
///
/// # Errors
///
/// Returns an error if any git step fails; conflicts and a missing upstream
/// are reported as outcomes.
pub fn run_commit_command(
    git: &impl GitRunner,
    message: Option<&str>,
    config: &Config,
) -> Result<CommitOutcome> {
    let outcome =
        commit(git, message, &config.sync.to_options()).context("failed to commit changes")?;
    println!("{outcome}");
    Ok(outcome)
}
