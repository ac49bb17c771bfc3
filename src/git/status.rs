// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Porcelain v1 status report parser.
//!
//! ```text
//! git status --porcelain=v1 -z
//!
//!   "XY path\0"                 ordinary entry
//!   "XY newpath\0oldpath\0"     X or Y is R (rename) or C (copy)
//!
//!   byte 0   X   index status
//!   byte 1   Y   work tree status
//!   byte 2   ' '
//!   byte 3.. path, NUL terminated, arbitrary bytes
//! ```
//!
//! Malformed input is rejected with `BadStatusFormat` carrying the byte
//! offset of the offending entry; nothing is skipped or guessed.

use std::path::PathBuf;

use super::backend::{GitRunner, git_args};
use crate::error::{GitError, SyncResult};

/// One entry of the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Index status code.
    pub x: char,
    /// Work tree status code.
    pub y: char,
    /// Original path, present only when `x` is `R` or `C`.
    pub old_path: Option<PathBuf>,
    /// Current path (the new name for renames and copies).
    pub path: PathBuf,
}

impl ChangeRecord {
    /// True for index renames and copies, the entries that keep `old_path`.
    #[must_use]
    pub const fn is_rename_or_copy(&self) -> bool {
        matches!(self.x, 'R' | 'C')
    }
}

/// True when the entry carries a second path field.
///
/// The code can sit in either column: ` R` is a work tree rename of an
/// intent-to-add path.
const fn has_original_path(x: char, y: char) -> bool {
    matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C')
}

fn bad(offset: usize, reason: &'static str) -> GitError {
    GitError::BadStatusFormat { offset, reason }
}

/// Reads one NUL-terminated field starting at `start`.
///
/// Returns the field and the offset just past its terminator.
fn field(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let len = buf[start..].iter().position(|&b| b == 0)?;
    Some((&buf[start..start + len], start + len + 1))
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Parses a `--porcelain=v1 -z` report into records, preserving order.
///
/// # Errors
///
/// Returns `GitError::BadStatusFormat` for a truncated status code, a missing
/// separator space, an unterminated or empty path, or a rename/copy entry
/// without its original path.
pub fn parse_status(buf: &[u8]) -> SyncResult<Vec<ChangeRecord>> {
    let mut records = Vec::new();
    let mut pos = 0;

    while pos < buf.len() {
        let entry = pos;
        if buf.len() - pos < 3 {
            return Err(bad(entry, "truncated status code").into());
        }
        let x = char::from(buf[pos]);
        let y = char::from(buf[pos + 1]);
        if buf[pos + 2] != b' ' {
            return Err(bad(entry, "missing separator after status code").into());
        }

        let (path, next) = field(buf, pos + 3).ok_or_else(|| bad(entry, "unterminated path"))?;
        if path.is_empty() {
            return Err(bad(entry, "empty path").into());
        }
        pos = next;

        let mut record = ChangeRecord {
            x,
            y,
            old_path: None,
            path: path_from_bytes(path),
        };
        if has_original_path(x, y) {
            let (old, next) = field(buf, pos)
                .filter(|(old, _)| !old.is_empty())
                .ok_or_else(|| bad(entry, "missing original path for rename or copy"))?;
            pos = next;
            // Work tree renames are consumed but not recorded.
            if record.is_rename_or_copy() {
                record.old_path = Some(path_from_bytes(old));
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Runs `git status --porcelain=v1 -z` and parses the report.
///
/// # Errors
///
/// Returns the runner's error if git fails, or `BadStatusFormat`.
pub fn read_status(git: &impl GitRunner) -> SyncResult<Vec<ChangeRecord>> {
    let stdout = git.output(&git_args(["status", "--porcelain=v1", "-z"]))?;
    let records = parse_status(&stdout)?;
    tracing::debug!(entries = records.len(), "parsed status report");
    Ok(records)
}
