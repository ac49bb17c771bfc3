// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |              add / commit / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '-------------+-------------'
//!                            |
//!                +-----------+-----------+
//!                v                       v
//!              stage                   sync
//!        classify, dotfiles     validate, commit,
//!           (ui prompt)        ahead/behind, ff
//!                |                       |
//!                +-----------+-----------+
//!                            v
//!                           git
//!          GitRunner, status, refs, diagnostics
//!
//!   +-----------------------------------------+
//!   |  core      process (bounded capture)    |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, ui        |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod stage;
pub mod sync;
pub mod ui;
