// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git boundary module.
//!
//! ```text
//!        Public API
//!   status.rs  refs.rs  discovery.rs
//!        \       |          |
//!         v      v          v
//!   ,------------------,   gix (read-only,
//!   | GitRunner (trait)|    no subprocess)
//!   '--------+---------'
//!            |
//!     +------+------+
//!     v             v
//!  ShellGit      FakeGit (tests)
//!  git CLI       scripted replies
//!     |
//!     v
//!  diagnostics.rs  stderr text --> GitCondition
//! ```
//!
//! **`ShellGit`**: every workflow command goes through the git executable.
//! **`discovery`**: gix locates the work tree before anything runs.

pub mod backend;
pub mod diagnostics;
pub mod discovery;
pub mod refs;
pub mod status;

#[cfg(test)]
pub(crate) mod fake;
