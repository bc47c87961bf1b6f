// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use devcommit::domain::{ChangeKind, ChangeSet, CommitStyle, FileChange, GenerationOptions};
use devcommit::error::{Error, Result};
use devcommit::services::git::{ChangeSource, CommitTarget, IndexSnapshot, SourceMode};
use devcommit::services::llm::LlmProvider;
use devcommit::services::selector::{PromptProvider, Selection};

/// Create a FileChange with a small unified diff for `path`.
#[allow(dead_code)]
pub fn make_file_change(path: &str, kind: ChangeKind) -> FileChange {
    let diff = format!(
        "diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n@@ -1 +1 @@\n-old\n+new\n"
    );
    FileChange::new(path, kind, diff)
}

/// ChangeSet of modified files at `paths`.
#[allow(dead_code)]
pub fn make_change_set(paths: &[&str]) -> ChangeSet {
    ChangeSet::new(
        paths
            .iter()
            .map(|p| make_file_change(p, ChangeKind::Modified))
            .collect(),
    )
}

#[allow(dead_code)]
pub fn generation_options(count: usize) -> GenerationOptions {
    GenerationOptions {
        locale: "en-US".into(),
        style: CommitStyle::General,
        count,
        model: "test-model".into(),
    }
}

// ─── Generation fake ─────────────────────────────────────────────────────────

/// Provider answering from a script; once the script is exhausted every call
/// returns `fallback`.
#[allow(dead_code)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answer with `text`.
    pub fn repeating(text: &str) -> Self {
        Self {
            fallback: text.to_string(),
            ..Self::new(Vec::new())
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        _system: &str,
        _prompt: &str,
        _cancel: CancellationToken,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[allow(dead_code)]
pub fn unavailable(message: &str) -> Error {
    Error::GenerationUnavailable {
        provider: "scripted".into(),
        message: message.into(),
    }
}

// ─── Version-control fakes ───────────────────────────────────────────────────

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    UnstageAll,
    Stage(Vec<PathBuf>),
    Snapshot,
    StageFrom(Vec<PathBuf>),
    Commit(String),
}

/// Records every index/history operation; commits whose message contains one
/// of `failing` are rejected.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingTarget {
    pub ops: Mutex<Vec<Op>>,
    pub failing: Vec<String>,
    pub snapshot_fails: bool,
}

#[allow(dead_code)]
impl RecordingTarget {
    pub fn failing_on(markers: &[&str]) -> Self {
        Self {
            failing: markers.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn without_snapshot() -> Self {
        Self {
            snapshot_fails: true,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Commit(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl CommitTarget for RecordingTarget {
    async fn unstage_all(&self) -> Result<()> {
        self.ops.lock().unwrap().push(Op::UnstageAll);
        Ok(())
    }

    async fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.ops.lock().unwrap().push(Op::Stage(paths.to_vec()));
        Ok(())
    }

    async fn snapshot_index(&self) -> Result<IndexSnapshot> {
        if self.snapshot_fails {
            return Err(Error::Git("index has unmerged entries".into()));
        }
        self.ops.lock().unwrap().push(Op::Snapshot);
        Ok(IndexSnapshot("4b825dc642cb6eb9a060e54bf8d69288fbee4904".into()))
    }

    async fn stage_from(&self, _snapshot: &IndexSnapshot, paths: &[PathBuf]) -> Result<()> {
        self.ops.lock().unwrap().push(Op::StageFrom(paths.to_vec()));
        Ok(())
    }

    async fn commit(&self, message: &str, _extra_args: &[String]) -> Result<()> {
        if self.failing.iter().any(|m| message.contains(m.as_str())) {
            return Err(Error::Git("pre-commit hook failed".into()));
        }
        self.ops.lock().unwrap().push(Op::Commit(message.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct FixedSource {
    pub changes: ChangeSet,
    pub unstaged: Vec<PathBuf>,
}

#[allow(dead_code)]
impl FixedSource {
    pub fn new(changes: ChangeSet) -> Self {
        Self {
            changes,
            unstaged: Vec::new(),
        }
    }
}

#[async_trait]
impl ChangeSource for FixedSource {
    async fn current_changes(&self, _mode: SourceMode) -> Result<ChangeSet> {
        if self.changes.is_empty() {
            return Err(Error::NoChanges);
        }
        Ok(self.changes.clone())
    }

    async fn unstaged_paths(&self) -> Result<Vec<PathBuf>> {
        Ok(self.unstaged.clone())
    }
}

// ─── Prompt fake ─────────────────────────────────────────────────────────────

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Answer {
    Many(Vec<usize>),
    One(Selection),
}

/// Answers prompts from a script and remembers what it was asked.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedPrompts {
    answers: Mutex<VecDeque<Answer>>,
    pub asked: Mutex<Vec<(String, Vec<String>)>>,
}

#[allow(dead_code)]
impl ScriptedPrompts {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<(String, Vec<String>)> {
        self.asked.lock().unwrap().clone()
    }

    fn next(&self, prompt: &str, items: &[String]) -> Answer {
        self.asked
            .lock()
            .unwrap()
            .push((prompt.to_string(), items.to_vec()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {prompt}"))
    }
}

impl PromptProvider for ScriptedPrompts {
    fn select_many(
        &self,
        prompt: &str,
        items: &[String],
        _defaults: &[bool],
    ) -> Result<Vec<usize>> {
        match self.next(prompt, items) {
            Answer::Many(picked) => Ok(picked),
            other => panic!("expected multi-select answer for {prompt}, script had {other:?}"),
        }
    }

    fn select_one(&self, prompt: &str, items: &[String], _allow_manual: bool) -> Result<Selection> {
        match self.next(prompt, items) {
            Answer::One(selection) => Ok(selection),
            other => panic!("expected single-select answer for {prompt}, script had {other:?}"),
        }
    }
}
