// stagesync: stage, commit and fast-forward a git working tree
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    AheadBehind, CommitOutcome, StageValidation, SyncDecision, SyncOptions, ahead_behind, commit,
    validate_index,
};
use crate::error::{GitError, SyncError};
use crate::git::fake::FakeGit;

const COUNT: &str = "rev-list --left-right --count";
const HEAD: &str = "rev-parse --abbrev-ref HEAD";
const UPSTREAM: &str = "rev-parse --abbrev-ref --symbolic-full-name";

/// Staged changes on `main` tracking `origin/main`.
fn tracked_repo() -> FakeGit {
    FakeGit::new()
        .exit("diff --cached --quiet", 1, "")
        .ok(HEAD, "main\n")
        .ok(UPSTREAM, "origin/main\n")
        .ok("config --get branch.main.remote", "origin\n")
}

fn offline() -> SyncOptions {
    SyncOptions::builder().fetch(false).build()
}

// --- AheadBehind ---

#[test]
fn test_parse_counts_left_is_behind() {
    assert_eq!(
        AheadBehind::parse("3\t1\n").unwrap(),
        AheadBehind { ahead: 1, behind: 3 }
    );
    assert_eq!(AheadBehind::parse("0 0").unwrap(), AheadBehind::default());
}

#[test]
fn test_parse_counts_rejects_garbage() {
    for text in ["", "1", "1\t2\t3", "a\tb", "-1\t0"] {
        let err = AheadBehind::parse(text).unwrap_err();
        assert!(
            matches!(err, SyncError::Git(ref e) if matches!(**e, GitError::MalformedCountOutput { .. })),
            "{text:?} gave {err:?}"
        );
    }
}

#[test]
fn test_decision_table() {
    let decide = |ahead, behind| AheadBehind { ahead, behind }.decision();
    assert_eq!(decide(0, 0), SyncDecision::UpToDate);
    assert_eq!(decide(2, 0), SyncDecision::Ahead);
    assert_eq!(decide(0, 3), SyncDecision::FastForward);
    assert_eq!(decide(1, 2), SyncDecision::Diverged);
}

// --- validate_index ---

#[test]
fn test_validate_index_states() {
    let clean = FakeGit::new();
    assert_eq!(validate_index(&clean).unwrap(), StageValidation::Clean);

    let staged = FakeGit::new().exit("diff --cached --quiet", 1, "");
    assert_eq!(validate_index(&staged).unwrap(), StageValidation::ReadyToCommit);

    let conflicted = FakeGit::new().ok("diff --name-only --diff-filter=U", "a.txt\0b.txt\0");
    assert_eq!(validate_index(&conflicted).unwrap(), StageValidation::HasConflicts);
}

#[test]
fn test_validate_index_refresh_is_best_effort() {
    let git = FakeGit::new()
        .unavailable("update-index")
        .exit("diff --cached --quiet", 1, "");
    assert_eq!(validate_index(&git).unwrap(), StageValidation::ReadyToCommit);
}

#[test]
fn test_validate_index_unexpected_exit() {
    let git = FakeGit::new().exit("diff --cached --quiet", 128, "fatal: bad index");
    assert!(matches!(validate_index(&git), Err(SyncError::Process(_))));
}

// --- ahead_behind ---

#[test]
fn test_fetch_failure_is_swallowed() {
    let git = FakeGit::new()
        .exit("fetch", 128, "fatal: unable to access 'https://example.invalid/'")
        .ok(COUNT, "0\t1\n");
    let counts = ahead_behind(&git, "origin/main", "origin", true).unwrap();
    assert_eq!(counts, AheadBehind { ahead: 1, behind: 0 });

    let unavailable = FakeGit::new().unavailable("fetch").ok(COUNT, "0\t0\n");
    assert!(ahead_behind(&unavailable, "origin/main", "origin", true).is_ok());
}

#[test]
fn test_fetch_can_be_skipped() {
    let git = FakeGit::new().ok(COUNT, "0\t0\n");
    ahead_behind(&git, "origin/main", "origin", false).unwrap();
    assert_eq!(git.count("fetch"), 0);
    assert_eq!(git.calls(), ["rev-list --left-right --count origin/main...HEAD"]);
}

#[test]
fn test_malformed_count_is_fatal() {
    let git = tracked_repo().ok(COUNT, "garbage\n");
    let err = commit(&git, Some("msg"), &offline()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"git error: unexpected ahead/behind output: "garbage\n""#);
}

// --- commit ---

#[test]
fn test_conflicts_never_commit() {
    let git = FakeGit::new()
        .ok("diff --name-only --diff-filter=U", "a.txt\0")
        .exit("diff --cached --quiet", 1, "");

    let outcome = commit(&git, Some("msg"), &offline()).unwrap();

    assert_eq!(outcome, CommitOutcome::Conflicts);
    assert_eq!(git.count("commit"), 0);
}

#[test]
fn test_commit_up_to_date() {
    let git = tracked_repo().ok(COUNT, "0\t0\n");
    let outcome = commit(&git, Some("msg"), &offline()).unwrap();
    assert_eq!(
        outcome,
        CommitOutcome::UpToDate {
            upstream: "origin/main".into()
        }
    );
    insta::assert_snapshot!(outcome.to_string(), @"committed on top of up-to-date origin/main");
}

#[test]
fn test_commit_ahead() {
    let git = tracked_repo().ok(COUNT, "0\t2\n");
    let outcome = commit(&git, Some("msg"), &offline()).unwrap();
    insta::assert_snapshot!(outcome.to_string(), @"committed; main is ahead of origin/main by 2 commit(s)");
    assert_eq!(git.count("merge"), 0);
}

#[test]
fn test_commit_behind_fast_forwards() {
    let git = tracked_repo().ok(COUNT, "3\t0\n").ok(COUNT, "0\t0\n");

    let outcome = commit(&git, Some("msg"), &offline()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::FastForwarded {
            upstream: "origin/main".into()
        }
    );
    assert_eq!(git.count("merge --ff-only --quiet origin/main"), 1);
    assert_eq!(git.count(COUNT), 2);
}

#[test]
fn test_commit_still_behind_after_fast_forward() {
    let git = tracked_repo()
        .ok(COUNT, "3\t0\n")
        .exit("merge", 128, "fatal: Not possible to fast-forward, aborting.")
        .ok(COUNT, "3\t0\n");

    let outcome = commit(&git, Some("msg"), &offline()).unwrap();

    insta::assert_snapshot!(outcome.to_string(), @"still behind origin/main by 3 commit(s); retry or resolve manually");
}

#[test]
fn test_commit_diverged_takes_no_action() {
    let git = tracked_repo().ok(COUNT, "2\t1\n");
    let outcome = commit(&git, Some("msg"), &offline()).unwrap();

    insta::assert_snapshot!(outcome.to_string(), @"committed; main has diverged from origin/main (1 ahead, 2 behind)");
    assert_eq!(git.count("merge"), 0);
}

#[test]
fn test_commit_counts_after_committing() {
    let git = tracked_repo().ok(COUNT, "0\t1\n");
    commit(&git, Some("msg"), &SyncOptions::default()).unwrap();

    insta::assert_debug_snapshot!(git.calls(), @r#"
    [
        "update-index -q --refresh",
        "diff --name-only --diff-filter=U -z",
        "diff --cached --quiet",
        "rev-parse --abbrev-ref HEAD",
        "rev-parse --abbrev-ref --symbolic-full-name @{u}",
        "commit --quiet -m msg",
        "config --get branch.main.remote",
        "fetch --quiet origin",
        "rev-list --left-right --count origin/main...HEAD",
    ]
    "#);
}

#[test]
fn test_commit_without_upstream() {
    let git = FakeGit::new()
        .exit("diff --cached --quiet", 1, "")
        .ok(HEAD, "topic\n")
        .exit(UPSTREAM, 128, "fatal: no upstream configured for branch 'topic'");

    let outcome = commit(&git, Some("msg"), &SyncOptions::default()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::CommittedWithoutUpstream {
            branch: "topic".into()
        }
    );
    assert_eq!(git.count("commit --quiet -m msg"), 1);
    assert_eq!(git.count("fetch"), 0);
    assert_eq!(git.count(COUNT), 0);
}

#[test]
fn test_commit_on_unborn_branch() {
    let git = FakeGit::new().exit("diff --cached --quiet", 1, "").exit(
        HEAD,
        128,
        "fatal: ambiguous argument 'HEAD': unknown revision or path not in the working tree.",
    );

    let outcome = commit(&git, Some("first"), &offline()).unwrap();

    assert_eq!(outcome, CommitOutcome::CommittedWithoutBranch);
    assert!(outcome.committed());
    assert_eq!(git.count("commit --quiet -m first"), 1);
}

#[test]
fn test_commit_without_message_uses_editor() {
    let git = tracked_repo().ok(COUNT, "0\t1\n");
    commit(&git, None, &offline()).unwrap();

    assert_eq!(git.count("commit"), 1);
    assert!(git.calls().iter().any(|c| c == "commit"));
}

#[test]
fn test_commit_failure_propagates() {
    let git = tracked_repo().exit("commit", 1, "error: gpg failed to sign the data");
    let err = commit(&git, Some("msg"), &offline()).unwrap_err();
    assert!(err.to_string().contains("gpg failed"));
    assert_eq!(git.count(COUNT), 0);
}

#[test]
fn test_clean_index_behind_fast_forwards() {
    let git = FakeGit::new()
        .ok(HEAD, "main\n")
        .ok(UPSTREAM, "origin/main\n")
        .ok(COUNT, "2\t0\n")
        .ok(COUNT, "0\t0\n");

    let outcome = commit(&git, None, &offline()).unwrap();

    assert_eq!(
        outcome,
        CommitOutcome::Synced {
            upstream: "origin/main".into()
        }
    );
    assert!(!outcome.committed());
    assert_eq!(git.count("commit"), 0);
    assert_eq!(git.count("merge --ff-only"), 1);
}

#[test]
fn test_clean_index_nothing_to_do() {
    let up_to_date = FakeGit::new()
        .ok(HEAD, "main\n")
        .ok(UPSTREAM, "origin/main\n")
        .ok(COUNT, "0\t1\n");
    assert_eq!(
        commit(&up_to_date, None, &offline()).unwrap(),
        CommitOutcome::NothingToCommit
    );
    assert_eq!(up_to_date.count("merge"), 0);

    let no_upstream = FakeGit::new()
        .ok(HEAD, "main\n")
        .exit(UPSTREAM, 128, "fatal: no upstream configured for branch 'main'");
    assert_eq!(
        commit(&no_upstream, None, &offline()).unwrap(),
        CommitOutcome::NothingToCommit
    );
    assert_eq!(no_upstream.count(COUNT), 0);
}

#[test]
fn test_outcome_messages() {
    let outcomes = [
        CommitOutcome::Conflicts,
        CommitOutcome::NothingToCommit,
        CommitOutcome::Synced {
            upstream: "origin/main".into(),
        },
        CommitOutcome::CommittedWithoutBranch,
        CommitOutcome::CommittedWithoutUpstream {
            branch: "topic".into(),
        },
        CommitOutcome::FastForwarded {
            upstream: "origin/main".into(),
        },
    ];
    let rendered: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    resolve conflicts before committing
    nothing to commit
    nothing to commit; fast-forwarded to origin/main
    committed; HEAD is not on a branch, nothing to sync
    committed on topic; no upstream configured
    committed and fast-forwarded to origin/main; up to date
    ");
}

#[test]
fn test_sync_options_defaults() {
    let opts = SyncOptions::default();
    assert!(opts.fetch);
    assert_eq!(opts.default_remote, "origin");
}
