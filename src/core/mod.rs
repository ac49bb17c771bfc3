// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!     core
//!      |
//!      v
//!   process
//!      |
//!   Builder --> run() --> ProcessOutput
//!   which()     bounded capture, exit mapping
//! ```

pub mod process;
