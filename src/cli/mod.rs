// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for stagesync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! stagesync [global options] [-a] [-c [-m MSG]] [REPO]
//!   neither -a nor -c   add, then commit
//!   -a                  add only
//!   -c                  commit only
//! ```

pub mod global;


use std::path::PathBuf;

use clap::Parser;

use crate::cli::global::GlobalOptions;
use crate::stage::DotfilePolicy;

/// Stage, commit and fast-forward a git working tree.
#[derive(Debug, Parser)]
#[command(
    name = "stagesync",
    author,
    version,
    about = "Stage, commit and fast-forward a git working tree",
    long_about = "stagesync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Stages every change in the working tree (asking before staging\n\
                  dotfiles), commits, then compares the branch with its upstream\n\
                  and fast-forwards when that is safe.",
    after_help = "CONFIG FILES:\n\n\
                  stagesync reads `stagesync.toml` from the current directory if\n\
                  present, then every file given with --config, then STAGESYNC_*\n\
                  environment variables (STAGESYNC_SECTION__KEY), then --set."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Repository path (any directory inside the work tree).
    #[arg(value_name = "REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Stage changes.
    #[arg(short = 'a', long)]
    pub add: bool,

    /// Commit staged changes and sync with upstream.
    #[arg(short = 'c', long)]
    pub commit: bool,

    /// Commit message; opens the editor when omitted.
    #[arg(short = 'm', long, value_name = "MSG")]
    pub message: Option<String>,

    /// How to treat dotfiles (overrides stage.dotfiles).
    #[arg(long, value_enum, value_name = "MODE")]
    pub dotfiles: Option<DotfilePolicy>,

    /// Skip fetching before counting ahead/behind.
    #[arg(long)]
    pub no_fetch: bool,

    /// Print the effective configuration and exit.
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether the add workflow runs.
    #[must_use]
    pub const fn run_add(&self) -> bool {
        self.add || !self.commit
    }

    /// Whether the commit workflow runs.
    #[must_use]
    pub const fn run_commit(&self) -> bool {
        self.commit || !self.add
    }

    /// Global overrides plus the workflow flags, as `section.key=value`.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.global.to_config_overrides();
        if let Some(policy) = self.dotfiles {
            overrides.push(format!("stage.dotfiles={policy}"));
        }
        if self.no_fetch {
            overrides.push("sync.fetch=false".to_string());
        }
        overrides
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
