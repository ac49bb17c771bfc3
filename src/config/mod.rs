// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for stagesync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. stagesync.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. STAGESYNC_* env vars
//! 5. --set section.key=value
//! 6. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! STAGESYNC_GLOBAL__LOG_LEVEL=4         → global.log_level = 4
//! STAGESYNC_STAGE__DOTFILES=exclude     → stage.dotfiles = "exclude"
//! STAGESYNC_SYNC__DEFAULT_REMOTE=up     → sync.default_remote = "up"
//! ```
//!
//! Sections and keys are split by a double underscore because keys
//! themselves contain single underscores.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig, StageConfig, SyncConfig};

/// Name of the optional per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = "stagesync.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STAGESYNC";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git invocation.
    pub git: GitConfig,
    /// Staging workflow.
    pub stage: StageConfig,
    /// Commit/sync workflow.
    pub sync: SyncConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stagesync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("stagesync.toml")
    ///     .with_env_prefix("STAGESYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<()> {
        self.git.validate()?;
        self.sync.validate()?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// One `key = value` line per option, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);

        options.insert("stage.dotfiles".into(), self.stage.dotfiles.to_string());
        options.insert("sync.fetch".into(), self.sync.fetch.to_string());
        options.insert(
            "sync.default_remote".into(),
            self.sync.default_remote.clone(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.log_level".into(),
            self.global.log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(ref path) = self.global.log_file {
            options.insert("global.log_file".into(), path.display().to_string());
        }
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.program".into(), self.git.program.clone());
        options.insert(
            "git.max_output_bytes".into(),
            self.git.max_output_bytes.to_string(),
        );
    }
}
