// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> open_repository() --> ShellGit
//!          --> cmd::run_* handlers
//!                add     stage_changes()  --> "staged N path(s) ..."
//!                commit  commit()         --> CommitOutcome line
//!                config  format_options() --> key = value lines
//! ```

pub mod add;
pub mod commit;
pub mod config;


use anyhow::Context;
use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::git::backend::ShellGit;
use crate::git::discovery::discover_worktree;

/// Locates the work tree containing `repo` and binds git to it.
///
/// # Errors
///
/// Returns an error if `repo` is not inside a non-bare repository or the
/// configured git program cannot be found.
pub fn open_repository(repo: &Path, config: &Config) -> Result<ShellGit> {
    let worktree = discover_worktree(repo)
        .with_context(|| format!("no git work tree at {}", repo.display()))?;
    debug!(worktree = %worktree.display(), "found work tree");

    let git = ShellGit::new(&config.git.program, &worktree)?
        .with_capture_limit(config.git.max_output_bytes);
    Ok(git)
}
