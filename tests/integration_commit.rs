// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the commit and sync workflow.
//!
//! Each test builds a bare "remote" plus one or two clones in a temporary
//! directory, so fetch, ahead/behind and fast-forward run against real refs.

use stagesync::git::backend::ShellGit;
use stagesync::stage::{DotfilePolicy, stage_changes};
use stagesync::sync::{
    AheadBehind, CommitOutcome, StageValidation, SyncOptions, ahead_behind, commit, validate_index,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Helper to run git commands in a directory, returning trimmed stdout
fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    run_git(&["config", "user.email", "test@test.com"], dir);
    run_git(&["config", "user.name", "Test"], dir);
    run_git(&["config", "commit.gpgsign", "false"], dir);
}

fn init_repo(dir: &Path) {
    run_git(&["init", "-q", "--initial-branch=main"], dir);
    configure_identity(dir);
}

fn commit_file(dir: &Path, name: &str, contents: &str, message: &str) {
    fs::write(dir.join(name), contents).unwrap();
    run_git(&["add", name], dir);
    run_git(&["commit", "-q", "-m", message], dir);
}

/// Bare remote seeded with one commit on `main`, plus a clone tracking it.
struct Remote {
    _temp: TempDir,
    bare: PathBuf,
    root: PathBuf,
}

impl Remote {
    fn new() -> Self {
        let temp = temp_dir();
        let root = temp.path().to_path_buf();
        let bare = root.join("remote.git");
        let seed = root.join("seed");
        fs::create_dir_all(&seed).unwrap();

        run_git(
            &["init", "-q", "--bare", "--initial-branch=main", bare.to_str().unwrap()],
            &root,
        );
        init_repo(&seed);
        commit_file(&seed, "README.md", "# Test\n", "Initial commit");
        run_git(&["remote", "add", "origin", bare.to_str().unwrap()], &seed);
        run_git(&["push", "-q", "-u", "origin", "main"], &seed);

        Self {
            _temp: temp,
            bare,
            root,
        }
    }

    fn clone(&self, name: &str) -> PathBuf {
        let dir = self.root.join(name);
        run_git(
            &["clone", "-q", self.bare.to_str().unwrap(), dir.to_str().unwrap()],
            &self.root,
        );
        configure_identity(&dir);
        dir
    }
}

fn shell_git(dir: &Path) -> ShellGit {
    ShellGit::new("git", dir).expect("git should be on PATH")
}

fn stage_all(git: &ShellGit) {
    stage_changes(git, &mut |_: &str| true, DotfilePolicy::Include).unwrap();
}

#[test]
fn commit_ahead_of_upstream() {
    let remote = Remote::new();
    let work = remote.clone("work");
    fs::write(work.join("feature.txt"), "feature\n").unwrap();

    let git = shell_git(&work);
    stage_all(&git);
    let outcome = commit(&git, Some("Add feature"), &SyncOptions::default()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::Ahead {
            branch: "main".into(),
            upstream: "origin/main".into(),
            ahead: 1,
        }
    );
    assert_eq!(run_git(&["log", "-1", "--format=%s"], &work), "Add feature");
}

#[test]
fn clean_index_fast_forwards_to_upstream() {
    let remote = Remote::new();
    let work = remote.clone("work");
    let other = remote.clone("other");
    commit_file(&other, "pushed.txt", "from elsewhere\n", "Pushed elsewhere");
    run_git(&["push", "-q"], &other);

    let git = shell_git(&work);
    let outcome = commit(&git, None, &SyncOptions::default()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::Synced {
            upstream: "origin/main".into()
        }
    );
    assert!(work.join("pushed.txt").exists());
}

#[test]
fn clean_index_without_fetch_sees_nothing_new() {
    let remote = Remote::new();
    let work = remote.clone("work");
    let other = remote.clone("other");
    commit_file(&other, "pushed.txt", "from elsewhere\n", "Pushed elsewhere");
    run_git(&["push", "-q"], &other);

    let git = shell_git(&work);
    let offline = SyncOptions::builder().fetch(false).build();
    let outcome = commit(&git, None, &offline).unwrap();

    assert_eq!(outcome, CommitOutcome::NothingToCommit);
    assert!(!work.join("pushed.txt").exists());
}

#[test]
fn commit_after_concurrent_push_reports_divergence() {
    let remote = Remote::new();
    let work = remote.clone("work");
    let other = remote.clone("other");
    commit_file(&other, "pushed.txt", "from elsewhere\n", "Pushed elsewhere");
    run_git(&["push", "-q"], &other);
    fs::write(work.join("local.txt"), "local\n").unwrap();

    let git = shell_git(&work);
    stage_all(&git);
    let outcome = commit(&git, Some("Local change"), &SyncOptions::default()).unwrap();

    insta::assert_snapshot!(
        outcome.to_string(),
        @"committed; main has diverged from origin/main (1 ahead, 1 behind)"
    );
    assert!(!work.join("pushed.txt").exists());
}

#[test]
fn unreachable_remote_falls_back_to_local_refs() {
    let remote = Remote::new();
    let work = remote.clone("work");
    run_git(
        &["remote", "set-url", "origin", "/nonexistent/remote.git"],
        &work,
    );

    let git = shell_git(&work);
    let counts = ahead_behind(&git, "origin/main", "origin", true).unwrap();

    assert_eq!(counts, AheadBehind::default());
}

#[test]
fn commit_without_upstream() {
    let temp = temp_dir();
    init_repo(temp.path());
    commit_file(temp.path(), "README.md", "# Test\n", "Initial commit");
    fs::write(temp.path().join("more.txt"), "more\n").unwrap();

    let git = shell_git(temp.path());
    stage_all(&git);
    let outcome = commit(&git, Some("More"), &SyncOptions::default()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::CommittedWithoutUpstream {
            branch: "main".into()
        }
    );
}

#[test]
fn first_commit_on_unborn_branch() {
    let temp = temp_dir();
    init_repo(temp.path());
    fs::write(temp.path().join("README.md"), "# Test\n").unwrap();

    let git = shell_git(temp.path());
    stage_all(&git);
    let outcome = commit(&git, Some("Initial commit"), &SyncOptions::default()).unwrap();

    assert_eq!(outcome, CommitOutcome::CommittedWithoutBranch);
    assert_eq!(run_git(&["rev-list", "--count", "HEAD"], temp.path()), "1");
}

#[test]
fn nothing_staged_in_fresh_clone() {
    let remote = Remote::new();
    let work = remote.clone("work");

    let git = shell_git(&work);
    assert_eq!(validate_index(&git).unwrap(), StageValidation::Clean);
    assert_eq!(
        commit(&git, Some("unused"), &SyncOptions::default()).unwrap(),
        CommitOutcome::NothingToCommit
    );
}

#[test]
fn conflicted_merge_blocks_commit() {
    let temp = temp_dir();
    let dir = temp.path();
    init_repo(dir);
    commit_file(dir, "shared.txt", "base\n", "Base");
    run_git(&["checkout", "-q", "-b", "topic"], dir);
    commit_file(dir, "shared.txt", "topic\n", "Topic edit");
    run_git(&["checkout", "-q", "main"], dir);
    commit_file(dir, "shared.txt", "main\n", "Main edit");

    let merge = Command::new("git")
        .args(["merge", "-q", "topic"])
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(!merge.status.success(), "merge should conflict");

    let git = shell_git(dir);
    assert_eq!(validate_index(&git).unwrap(), StageValidation::HasConflicts);

    let head_before = run_git(&["rev-parse", "HEAD"], dir);
    let outcome = commit(&git, Some("Should not happen"), &SyncOptions::default()).unwrap();

    assert_eq!(outcome, CommitOutcome::Conflicts);
    assert_eq!(run_git(&["rev-parse", "HEAD"], dir), head_before);
}
