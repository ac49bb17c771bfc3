// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config
//!   [global] log_level, file_log_level, log_file
//!   [git]    program, max_output_bytes
//!   [stage]  dotfiles (ask | include | exclude)
//!   [sync]   fetch, default_remote
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::process::builder::DEFAULT_CAPTURE_LIMIT;
use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::stage::DotfilePolicy;
use crate::sync::SyncOptions;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// How git is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Executable name or path, resolved via PATH.
    pub program: String,
    /// Bytes kept per captured stream.
    pub max_output_bytes: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            max_output_bytes: DEFAULT_CAPTURE_LIMIT,
        }
    }
}

impl GitConfig {
    /// Rejects an empty program name or a zero capture limit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "program".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.max_output_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "max_output_bytes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Staging options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// What to do with dotfiles among the candidates.
    pub dotfiles: DotfilePolicy,
}

/// Upstream synchronization options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Fetch the upstream's remote before counting (best-effort).
    pub fetch: bool,
    /// Remote used when the branch does not name one.
    pub default_remote: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch: true,
            default_remote: "origin".to_string(),
        }
    }
}

impl SyncConfig {
    /// Rejects an empty default remote.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for `sync.default_remote`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_remote.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "default_remote".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn to_options(&self) -> SyncOptions {
        SyncOptions::builder()
            .fetch(self.fetch)
            .default_remote(self.default_remote.clone())
            .build()
    }
}
