// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Yes/no confirmation.
//!
//! ```text
//! Prompter (trait)
//!   LinePrompter<R, W>    question + " [y/N] " --> W, one line <-- R
//!   FnMut(&str) -> bool   scripted answers in tests
//! ```
//!
//! An empty line, EOF, or anything not starting with `y`/`Y` is "no".

use std::io::{self, BufRead, Write};

use crate::error::{PromptError, SyncResult};

/// Asks the operator a yes/no question.
pub trait Prompter {
    /// Returns true only on an affirmative answer.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if the question cannot be written or the
    /// answer cannot be read.
    fn confirm(&mut self, question: &str) -> SyncResult<bool>;
}

impl<F: FnMut(&str) -> bool> Prompter for F {
    fn confirm(&mut self, question: &str) -> SyncResult<bool> {
        Ok(self(question))
    }
}

/// Line-oriented prompter over any reader/writer pair.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> SyncResult<bool> {
        write!(self.output, "{question} [y/N] ").map_err(PromptError::Write)?;
        self.output.flush().map_err(PromptError::Write)?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(PromptError::Read)?;

        Ok(is_affirmative(&answer))
    }
}

/// True when the first non-blank character is `y` or `Y`.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))
}
