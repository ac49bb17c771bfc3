// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Add command.

use anyhow::Context;

use crate::config::Config;
use crate::error::Result;
use crate::git::backend::GitRunner;
use crate::stage::{StageCounts, stage_changes};
use crate::ui::Prompter;

/// Stages the work tree and prints a summary line.
///
/// # Errors
///
/// Returns an error if reading status, prompting, or staging fails.
pub fn run_add_command(
    git: &impl GitRunner,
    prompter: &mut impl Prompter,
    config: &Config,
) -> Result<StageCounts> {
    let counts = stage_changes(git, prompter, config.stage.dotfiles)
        .context("failed to stage changes")?;

    if counts == StageCounts::default() {
        println!("nothing to stage");
    } else {
        println!("{counts}");
    }
    Ok(counts)
}
