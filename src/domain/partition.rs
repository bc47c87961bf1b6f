// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use super::{ChangeSet, FileChange};

/// Label shared by the whole-repository partition and by files that sit
/// directly in the repository root. Parentheses keep it apart from any
/// top-level directory name a user is likely to have.
pub const GLOBAL_LABEL: &str = "(root)";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionKey {
    Global,
    Directory(String),
    /// A single file, used when an explicit file list is split per file.
    File(String),
}

impl PartitionKey {
    pub fn label(&self) -> &str {
        match self {
            Self::Global => GLOBAL_LABEL,
            Self::Directory(name) | Self::File(name) => name,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Global => 0,
            Self::Directory(_) => 1,
            Self::File(_) => 2,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Keys sort by their label; equal labels fall back to the variant order.
impl Ord for PartitionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label()
            .cmp(other.label())
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for PartitionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A group of files destined for one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: PartitionKey,
    /// Members, sorted by path.
    pub files: Vec<FileChange>,
    /// Members' diffs concatenated in path order.
    pub diff: String,
}

impl Partition {
    pub fn new(key: PartitionKey, mut files: Vec<FileChange>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let diff = files
            .iter()
            .map(|f| f.diff.trim_end_matches('\n'))
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Self { key, files, diff }
    }

    /// The single partition used when everything goes into one commit.
    pub fn global(changes: &ChangeSet) -> Self {
        Self::new(PartitionKey::Global, changes.files().to_vec())
    }

    pub fn label(&self) -> &str {
        self.key.label()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Paths to hand to `git add`, rename sources included.
    pub fn stage_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .files
            .iter()
            .flat_map(|f| f.stage_paths().map(|p| p.to_path_buf()))
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    pub fn insertions(&self) -> usize {
        self.files.iter().map(|f| f.additions).sum()
    }

    pub fn deletions(&self) -> usize {
        self.files.iter().map(|f| f.deletions).sum()
    }
}
