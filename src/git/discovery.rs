// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Work tree discovery.
//!
//! ```text
//! start path (file or directory, any depth)
//!   --> gix::discover (walks up to the enclosing .git)
//!   --> repo.workdir()
//!         Some(root) --> root
//!         None       --> BareRepository
//! ```
//!
//! Every git command afterwards runs with the returned root as its cwd.

use std::path::{Path, PathBuf};

use crate::error::{GitError, SyncResult};

/// Returns the root of the work tree containing `start`.
///
/// # Errors
///
/// Returns `RepoNotFound` if `start` does not exist, `Gix` if no repository
/// encloses it, and `BareRepository` if the repository has no work tree.
pub fn discover_worktree(start: &Path) -> SyncResult<PathBuf> {
    let start = start.canonicalize().map_err(|_| GitError::RepoNotFound {
        path: start.display().to_string(),
    })?;

    let repo = gix::discover(&start).map_err(|e| GitError::Gix(Box::new(e)))?;
    let root = repo.workdir().ok_or_else(|| GitError::BareRepository {
        path: repo.git_dir().display().to_string(),
    })?;

    Ok(root.to_path_buf())
}
