// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::{LogConfig, LogLevel, open_log_file};
use crate::config::types::GlobalConfig;

#[test]
fn test_log_level_range() {
    let levels: Vec<_> = (0..=6).map(|n| LogLevel::from_u8(n).map(u8::from)).collect();
    insta::assert_debug_snapshot!(levels, @r"
    [
        Some(
            0,
        ),
        Some(
            1,
        ),
        Some(
            2,
        ),
        Some(
            3,
        ),
        Some(
            4,
        ),
        Some(
            5,
        ),
        None,
    ]
    ");
}

#[test]
fn test_log_level_new_rejects_out_of_range() {
    let err = LogLevel::new(9).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'log_level' in section '[global]': log level must be 0-5, got 9"
    );
}

#[test]
fn test_log_level_serde_goes_through_range_check() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&LogLevel::WARN).unwrap(), "2");

    let err = serde_json::from_str::<LogLevel>("7").unwrap_err();
    assert!(err.to_string().contains("log level must be 0-5, got 7"));
}

#[test]
fn test_directives_keep_dependencies_quiet() {
    assert_eq!(LogLevel::SILENT.directives(), "off");
    assert_eq!(LogLevel::INFO.directives(), "warn,stagesync=info");
    assert_eq!(LogLevel::DEBUG.directives(), "warn,stagesync=debug");
    assert_eq!(LogLevel::TRACE.directives(), "trace");
    assert!(LogLevel::ERROR < LogLevel::TRACE);
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
}

#[test]
fn test_log_config_from_global_section() {
    let global = GlobalConfig {
        log_level: LogLevel::WARN,
        file_log_level: LogLevel::DEBUG,
        log_file: Some(PathBuf::from("logs/sync.log")),
    };

    let config = LogConfig::from(&global);

    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some(Path::new("logs/sync.log")));
}

#[test]
fn test_open_log_file_appends_and_creates_parents() {
    use std::io::Write;

    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nested").join("sync.log");

    open_log_file(&path).unwrap().write_all(b"first\n").unwrap();
    open_log_file(&path).unwrap().write_all(b"second\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
}
