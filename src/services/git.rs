// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{ChangeKind, ChangeSet, FileChange, count_changes};
use crate::error::{Error, Result};

/// Hash of git's empty tree, the diff base before the first commit.
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Which changes a run offers for committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// The index (`git diff --cached`).
    Staged,
    /// Every tracked modification against HEAD, staged or not.
    WorkingTree,
}

/// Read side of the version-control adapter.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    async fn current_changes(&self, mode: SourceMode) -> Result<ChangeSet>;

    /// Paths whose working-tree content differs from the index.
    async fn unstaged_paths(&self) -> Result<Vec<PathBuf>>;
}

/// A frozen copy of the index, identified by the tree `git write-tree` made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSnapshot(pub String);

/// Write side; only the commit sequencer holds one.
#[async_trait]
pub trait CommitTarget: Send + Sync {
    async fn unstage_all(&self) -> Result<()>;

    /// Stage `paths` as they are in the working tree.
    async fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Record the index as it stands, before anything is reset.
    async fn snapshot_index(&self) -> Result<IndexSnapshot>;

    /// Copy the entries for `paths` from `snapshot` into the index. Paths the
    /// snapshot lacks are removed; the working tree is never read.
    async fn stage_from(&self, snapshot: &IndexSnapshot, paths: &[PathBuf]) -> Result<()>;

    async fn commit(&self, message: &str, extra_args: &[String]) -> Result<()>;
}

pub struct GitService {
    repo: gix::ThreadSafeRepository,
    work_dir: PathBuf,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        Self::discover_at(".")
    }

    pub fn discover_at(dir: impl AsRef<Path>) -> Result<Self> {
        let repo = gix::discover(dir.as_ref())
            .map_err(|e| Error::SourceUnavailable(format!("not a git repository ({e})")))?;

        let work_dir = repo
            .work_dir()
            .ok_or_else(|| Error::SourceUnavailable("bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self {
            repo: repo.into_sync(),
            work_dir,
        })
    }

    pub fn check_state(&self) -> Result<()> {
        let repo = self.repo.to_thread_local();
        if matches!(repo.state(), Some(gix::state::InProgress::Merge)) {
            return Err(Error::MergeInProgress);
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(["-c", "core.quotePath=false"])
            .env("GIT_LITERAL_PATHSPECS", "1")
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Run a read-only git command; failures mean the source is unusable.
    async fn read(&self, args: &[&str]) -> Result<String> {
        let output = self
            .command()
            .args(args)
            .output()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("cannot run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::SourceUnavailable(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a git command that mutates the index or history.
    ///
    /// The child gets its own process group so a terminal interrupt reaches
    /// only us; the orchestrator decides when to stop.
    async fn write<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command();
        cmd.args(args);
        #[cfg(unix)]
        cmd.process_group(0);

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::Git(detail));
        }
        Ok(())
    }

    pub async fn has_head(&self) -> bool {
        self.read(&["rev-parse", "--verify", "--quiet", "HEAD"])
            .await
            .is_ok()
    }

    async fn diff_base(&self, mode: SourceMode) -> Vec<String> {
        match mode {
            SourceMode::Staged => vec!["--cached".into()],
            SourceMode::WorkingTree => {
                let base = if self.has_head().await { "HEAD" } else { EMPTY_TREE };
                vec![base.into()]
            }
        }
    }

    async fn file_diff(&self, base: &[String], change: &FileChange) -> Result<String> {
        let mut args: Vec<&str> = vec!["diff"];
        args.extend(base.iter().map(String::as_str));
        args.extend(["--no-ext-diff", "--unified=3", "-M", "--"]);

        let paths: Vec<String> = change
            .stage_paths()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        args.extend(paths.iter().map(String::as_str));

        self.read(&args).await
    }

    /// Parse `git diff --name-status -z -M` output into (kind, path, old path).
    ///
    /// Fields are NUL-separated: a status, then one path, or two for renames
    /// and copies.
    pub fn parse_name_status(output: &str) -> Vec<(ChangeKind, PathBuf, Option<PathBuf>)> {
        let mut entries = Vec::new();
        let mut fields = output.split('\0').filter(|f| !f.is_empty());

        while let Some(status) = fields.next() {
            let two_paths = status.starts_with(['R', 'C']);
            let Some(first) = fields.next() else { break };
            let second = if two_paths { fields.next() } else { None };
            if two_paths && second.is_none() {
                break;
            }

            let Some(kind) = ChangeKind::from_status(status) else {
                continue;
            };

            match (kind, second) {
                (ChangeKind::Renamed, Some(new)) => {
                    entries.push((kind, PathBuf::from(new), Some(PathBuf::from(first))));
                }
                // copies report source and destination; only the destination changed
                (_, Some(new)) => entries.push((kind, PathBuf::from(new), None)),
                (_, None) => entries.push((kind, PathBuf::from(first), None)),
            }
        }

        entries
    }

    pub async fn push(&self) -> Result<()> {
        // inherit stdio so credential prompts reach the terminal
        let status = Command::new("git")
            .arg("push")
            .current_dir(&self.work_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Push(format!("git push exited with {status}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeSource for GitService {
    async fn current_changes(&self, mode: SourceMode) -> Result<ChangeSet> {
        self.check_state()?;

        let base = self.diff_base(mode).await;
        let mut args: Vec<&str> = vec!["diff"];
        args.extend(base.iter().map(String::as_str));
        args.extend(["--name-status", "-z", "-M"]);
        let status_output = self.read(&args).await?;

        let mut files = Vec::new();
        for (kind, path, old_path) in Self::parse_name_status(&status_output) {
            let mut change = FileChange::new(path, kind, "");
            if let Some(old) = old_path {
                change = change.renamed_from(old);
            }
            let diff = self.file_diff(&base, &change).await?;
            let (additions, deletions) = count_changes(&diff);
            files.push(FileChange {
                diff,
                additions,
                deletions,
                ..change
            });
        }

        debug!(mode = ?mode, files = files.len(), "changes read");

        if files.is_empty() {
            return Err(Error::NoChanges);
        }

        Ok(ChangeSet::new(files))
    }

    async fn unstaged_paths(&self) -> Result<Vec<PathBuf>> {
        let output = self.read(&["diff", "--name-only", "-z"]).await?;
        Ok(output
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[async_trait]
impl CommitTarget for GitService {
    async fn unstage_all(&self) -> Result<()> {
        if self.has_head().await {
            self.write(["reset", "-q"]).await
        } else {
            self.write(["read-tree", "--empty"]).await
        }
    }

    async fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        // `git add` rejects pathspecs that exist nowhere, so vanished paths
        // (deletions, rename sources) are removed from the index instead
        let (present, missing): (Vec<&PathBuf>, Vec<&PathBuf>) = paths
            .iter()
            .partition(|p| self.work_dir.join(p).symlink_metadata().is_ok());

        if !present.is_empty() {
            let mut args = vec![OsStr::new("add"), OsStr::new("-A"), OsStr::new("--")];
            args.extend(present.iter().map(|p| p.as_os_str()));
            self.write(args).await?;
        }

        if !missing.is_empty() {
            let mut args = vec![
                OsStr::new("rm"),
                OsStr::new("-q"),
                OsStr::new("--cached"),
                OsStr::new("--ignore-unmatch"),
                OsStr::new("--"),
            ];
            args.extend(missing.iter().map(|p| p.as_os_str()));
            self.write(args).await?;
        }

        Ok(())
    }

    async fn snapshot_index(&self) -> Result<IndexSnapshot> {
        let tree = self.read(&["write-tree"]).await?;
        Ok(IndexSnapshot(tree.trim().to_string()))
    }

    async fn stage_from(&self, snapshot: &IndexSnapshot, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec![
            OsStr::new("reset"),
            OsStr::new("-q"),
            OsStr::new(snapshot.0.as_str()),
            OsStr::new("--"),
        ];
        args.extend(paths.iter().map(|p| p.as_os_str()));
        self.write(args).await
    }

    async fn commit(&self, message: &str, extra_args: &[String]) -> Result<()> {
        let mut args: Vec<&str> = vec!["commit", "-q", "-m", message];
        args.extend(extra_args.iter().map(String::as_str));
        self.write(args).await
    }
}
