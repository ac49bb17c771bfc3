// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Translation of git's human-readable stderr into conditions.
//!
//! Git reports some recoverable states only as text. All matching on that
//! text lives here; commands run with `LC_ALL=C` so the wording is stable.

/// A recoverable repository state recognized from stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitCondition {
    /// The branch has no upstream, or HEAD is not a branch at all.
    NoUpstream,
    /// HEAD does not resolve to a commit (unborn branch).
    MissingHead,
}

const NO_UPSTREAM: &[&str] = &[
    "no upstream configured",
    "does not point to a branch",
    "not stored as a remote-tracking branch",
];

/// Also matches an `@{u}` lookup whose remote-tracking ref is absent;
/// `refs::upstream_name` folds that into `NoUpstream`.
const MISSING_HEAD: &[&str] = &[
    "ambiguous argument 'head'",
    "unknown revision",
    "needed a single revision",
    "does not have any commits yet",
];

/// Maps stderr text to a [`GitCondition`], if it names one.
#[must_use]
pub fn translate_stderr(stderr: &[u8]) -> Option<GitCondition> {
    let text = String::from_utf8_lossy(stderr).to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if mentions(NO_UPSTREAM) {
        Some(GitCondition::NoUpstream)
    } else if mentions(MISSING_HEAD) {
        Some(GitCondition::MissingHead)
    } else {
        None
    }
}
