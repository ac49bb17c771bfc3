// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> open_repository()
//!   --show-config | add --> commit
//! ```

use std::process::ExitCode;

use stagesync::cli::{self, Cli};
use stagesync::cmd::add::run_add_command;
use stagesync::cmd::commit::run_commit_command;
use stagesync::cmd::config::run_show_config_command;
use stagesync::cmd::open_repository;
use stagesync::config::loader::ConfigLoader;
use stagesync::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use stagesync::logging::{LogConfig, LogGuard, init_logging};
use stagesync::ui::LinePrompter;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let loader = match build_config_loader(&cli) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let config_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard: LogGuard = match init_logging(&LogConfig::from(&config.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.show_config {
        run_show_config_command(&config, &config_files);
        return ExitCode::SUCCESS;
    }

    match dispatch(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_config_loader(cli: &Cli) -> stagesync::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for path in &cli.global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for assignment in cli.to_config_overrides() {
        loader = loader.set_assignment(&assignment)?;
    }
    Ok(loader)
}

fn dispatch(cli: &Cli, config: &Config) -> stagesync::error::Result<()> {
    let git = open_repository(&cli.repo, config)?;

    if cli.run_add() {
        run_add_command(&git, &mut LinePrompter::stdio(), config)?;
    }

    if cli.run_commit() {
        run_commit_command(&git, cli.message.as_deref(), config)?;
    }

    Ok(())
}
