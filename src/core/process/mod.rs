// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Synchronous process spawning.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .capture_stdout() .capture_limit()
//!   .run()
//!       --> std::process::Command
//!           drain stdout/stderr (scoped threads, bounded)
//!           map ExitStatus: Exited(0) | Exited(n) | signal
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```
//!
//! Every call blocks until the child exits. There is no timeout.

pub mod builder;
mod io;
mod runner;
