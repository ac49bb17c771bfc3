// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted [`GitRunner`] for workflow tests.
//!
//! Rules match on the command line prefix (`"rev-parse --abbrev-ref"`).
//! The first matching rule wins; unmatched commands exit 0 with no output.
//! Scripting the same prefix again queues a reply: queued replies are used
//! in order and the last one repeats.

use std::cell::RefCell;
use std::ffi::OsString;

use super::backend::{GitRunner, describe};
use crate::core::process::builder::ProcessOutput;
use crate::error::{ProcessError, SyncResult};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok(Vec<u8>),
    Exit(i32, String),
    Unavailable,
}

#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    rules: RefCell<Vec<(String, Vec<Reply>)>>,
    calls: RefCell<Vec<String>>,
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(self, prefix: &str, reply: Reply) -> Self {
        {
            let mut rules = self.rules.borrow_mut();
            match rules.iter_mut().find(|(p, _)| p == prefix) {
                Some((_, replies)) => replies.push(reply),
                None => rules.push((prefix.to_string(), vec![reply])),
            }
        }
        self
    }

    pub(crate) fn ok(self, prefix: &str, stdout: impl Into<Vec<u8>>) -> Self {
        self.script(prefix, Reply::Ok(stdout.into()))
    }

    pub(crate) fn exit(self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.script(prefix, Reply::Exit(code, stderr.to_string()))
    }

    pub(crate) fn unavailable(self, prefix: &str) -> Self {
        self.script(prefix, Reply::Unavailable)
    }

    /// Every command run so far, without the leading `git`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn reply(&self, args: &[OsString]) -> SyncResult<ProcessOutput> {
        let line = describe(args);
        let line = line.strip_prefix("git ").unwrap_or_default().to_string();
        self.calls.borrow_mut().push(line.clone());

        let reply = self
            .rules
            .borrow_mut()
            .iter_mut()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, replies)| {
                if replies.len() > 1 {
                    replies.remove(0)
                } else {
                    replies[0].clone()
                }
            });

        match reply {
            None => Ok(ProcessOutput::default()),
            Some(Reply::Ok(stdout)) => Ok(ProcessOutput::new(0, stdout, Vec::new())),
            Some(Reply::Exit(code, stderr)) => Ok(ProcessOutput::new(code, Vec::new(), stderr)),
            Some(Reply::Unavailable) => Err(ProcessError::ExecutableNotFound {
                name: "git".to_string(),
            }
            .into()),
        }
    }
}

impl GitRunner for FakeGit {
    fn capture(&self, args: &[OsString]) -> SyncResult<ProcessOutput> {
        self.reply(args)
    }

    fn run(&self, args: &[OsString]) -> SyncResult<()> {
        let output = self.reply(args)?;
        output.ensure_success(&describe(args))?;
        Ok(())
    }

    fn run_interactive(&self, args: &[OsString]) -> SyncResult<()> {
        self.run(args)
    }
}
