// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Full runs of the orchestrator against throwaway repositories.

mod helpers;

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use devcommit::domain::{OutcomeStatus, RunReport};
use devcommit::services::exclusion::ExclusionFilter;
use devcommit::services::gateway::MessageGateway;
use devcommit::services::git::GitService;
use devcommit::services::orchestrator::{Orchestrator, RunOptions};
use devcommit::services::selector::Selection;
use helpers::{Answer, ScriptedPrompts, ScriptedProvider, generation_options};

// ─── Test helpers ────────────────────────────────────────────────────────────

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.email", "dev@example.com"]);
    git(dir.path(), &["config", "user.name", "Dev"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn staged(dir: &Path) -> String {
    git(dir, &["diff", "--cached", "--name-status"])
}

fn changed_in(dir: &Path, rev: &str) -> String {
    git(dir, &["show", "-M", "--name-status", "--format=", rev])
}

fn gateway(provider: ScriptedProvider) -> MessageGateway {
    MessageGateway::new(Box::new(provider), generation_options(1), 24_000)
        .with_retry_delay(Duration::ZERO)
}

fn per_directory() -> RunOptions {
    RunOptions {
        directory_flag: Some(true),
        ..RunOptions::default()
    }
}

async fn run(
    repo: &Path,
    provider: ScriptedProvider,
    prompts: Option<&ScriptedPrompts>,
) -> RunReport {
    let service = GitService::discover_at(repo).unwrap();
    let gateway = gateway(provider);
    let mut orchestrator = Orchestrator::new(
        &service,
        &service,
        &gateway,
        ExclusionFilter::new::<&str>(&[]).unwrap(),
        per_directory(),
    );
    if let Some(prompts) = prompts {
        orchestrator = orchestrator.with_prompts(prompts);
    }
    orchestrator.run(&CancellationToken::new()).await.unwrap()
}

// ─── Split runs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn staged_deletion_of_a_kept_file_is_committed_on_its_own() {
    let repo = init_repo();
    write(repo.path(), "a/secret.env", "TOKEN=1\n");
    write(repo.path(), "b/y.txt", "one\n");
    commit_all(repo.path(), "init");

    git(repo.path(), &["rm", "-q", "--cached", "a/secret.env"]);
    write(repo.path(), "b/y.txt", "two\n");
    git(repo.path(), &["add", "b/y.txt"]);

    let provider = ScriptedProvider::new(vec![
        Ok("Stop tracking secret".into()),
        Ok("Update y".into()),
    ]);
    let report = run(repo.path(), provider, None).await;

    assert_eq!(report.committed_count(), 2, "{report:?}");
    assert_eq!(changed_in(repo.path(), "HEAD~1").trim(), "D\ta/secret.env");
    assert_eq!(changed_in(repo.path(), "HEAD").trim(), "M\tb/y.txt");

    assert!(git(repo.path(), &["ls-files", "a"]).trim().is_empty());
    assert!(repo.path().join("a/secret.env").exists(), "file stays on disk");
    assert!(staged(repo.path()).trim().is_empty());
}

#[tokio::test]
async fn rename_across_roots_lands_in_the_destination_commit() {
    let repo = init_repo();
    write(repo.path(), "old/name.txt", "same content\nacross the move\n");
    write(repo.path(), "docs/x.md", "# x\n");
    commit_all(repo.path(), "init");

    fs::create_dir_all(repo.path().join("new")).unwrap();
    git(repo.path(), &["mv", "old/name.txt", "new/name.txt"]);
    write(repo.path(), "docs/x.md", "# x\n\nmore\n");
    git(repo.path(), &["add", "docs/x.md"]);

    let provider = ScriptedProvider::new(vec![Ok("Expand docs".into()), Ok("Move name".into())]);
    let report = run(repo.path(), provider, None).await;

    let labels: Vec<&str> = report.outcomes.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["docs", "new"]);
    assert_eq!(report.committed_count(), 2);

    assert_eq!(changed_in(repo.path(), "HEAD~1").trim(), "M\tdocs/x.md");
    let moved = changed_in(repo.path(), "HEAD");
    assert!(moved.starts_with("R100\told/name.txt\tnew/name.txt"), "got {moved:?}");
    assert!(staged(repo.path()).trim().is_empty());
}

#[tokio::test]
async fn skipped_partition_stays_staged_deletions_included() {
    let repo = init_repo();
    write(repo.path(), "a/old.txt", "legacy\n");
    write(repo.path(), "b/y.txt", "one\n");
    commit_all(repo.path(), "init");

    git(repo.path(), &["rm", "-q", "--cached", "a/old.txt"]);
    write(repo.path(), "a/x.txt", "new\n");
    write(repo.path(), "b/y.txt", "two\n");
    git(repo.path(), &["add", "a/x.txt", "b/y.txt"]);

    let prompts = ScriptedPrompts::new(vec![
        Answer::Many(vec![0, 1]),
        Answer::One(Selection::Choice(2)), // Skip this commit
        Answer::One(Selection::Choice(0)),
    ]);
    let report = run(
        repo.path(),
        ScriptedProvider::repeating("Change things"),
        Some(&prompts),
    )
    .await;

    assert_eq!(report.outcomes[0].status, OutcomeStatus::Skipped);
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Committed);
    assert_eq!(changed_in(repo.path(), "HEAD").trim(), "M\tb/y.txt");

    assert_eq!(staged(repo.path()), "D\ta/old.txt\nA\ta/x.txt\n");
    assert!(repo.path().join("a/old.txt").exists());
}
