// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output capture for processes.
//!
//! ```text
//! collect_output()
//!   thread::scope
//!     stderr reader thread --> drain(limit)
//!     stdout on caller     --> drain(limit)
//!   --> (Captured, Captured)
//!
//! drain(): keep first `limit` bytes, discard the rest so the child
//!          never blocks on a full pipe.
//! ```

use std::io::{self, Read};
use std::process::Child;
use tracing::trace;

use super::builder::StreamFlags;

/// Bytes read from one stream.
#[derive(Debug, Default)]
pub(super) struct Captured {
    pub(super) bytes: Vec<u8>,
    /// More than `limit` bytes were written; the excess was discarded.
    pub(super) truncated: bool,
}

/// Reads a stream to EOF, keeping at most `limit` bytes.
pub(super) fn drain<R: Read>(mut reader: R, limit: usize) -> io::Result<Captured> {
    let mut bytes = Vec::new();
    (&mut reader)
        .take(u64::try_from(limit).unwrap_or(u64::MAX))
        .read_to_end(&mut bytes)?;
    let excess = io::copy(&mut reader, &mut io::sink())?;
    Ok(Captured {
        bytes,
        truncated: excess > 0,
    })
}

/// Drains the child's piped stdout and stderr concurrently.
///
/// Streams that were not piped come back empty.
pub(super) fn collect_output(child: &mut Child, limit: usize) -> io::Result<(Captured, Captured)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    std::thread::scope(|scope| -> io::Result<(Captured, Captured)> {
        let stderr_reader = stderr.map(|pipe| scope.spawn(move || drain(pipe, limit)));

        let out = match stdout {
            Some(pipe) => drain(pipe, limit)?,
            None => Captured::default(),
        };
        let err = match stderr_reader {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("stderr reader panicked"))??,
            None => Captured::default(),
        };
        Ok((out, err))
    })
}

/// Emits captured lines at trace level when `FORWARD_TO_LOG` is set.
pub(super) fn forward_to_log(process: &str, stream: &str, flags: StreamFlags, bytes: &[u8]) {
    if !flags.contains(StreamFlags::FORWARD_TO_LOG) {
        return;
    }
    for line in String::from_utf8_lossy(bytes).lines() {
        trace!(process = %process, stream = %stream, line = %line, "output");
    }
}
