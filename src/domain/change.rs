// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeKind {
    /// Parse the status letter of `git diff --name-status` (`R100` → Renamed).
    pub fn from_status(status: &str) -> Option<Self> {
        match status.chars().next()? {
            'A' | 'C' => Some(Self::Added),
            'M' | 'T' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Added => "[+]",
            Self::Modified => "[M]",
            Self::Deleted => "[-]",
            Self::Renamed => "[R]",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
            Self::Renamed => write!(f, "renamed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    /// Source path of a rename.
    pub old_path: Option<PathBuf>,
    pub kind: ChangeKind,
    pub diff: String,
    pub additions: usize,
    pub deletions: usize,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, diff: impl Into<String>) -> Self {
        let diff = diff.into();
        let (additions, deletions) = count_changes(&diff);
        Self {
            path: path.into(),
            old_path: None,
            kind,
            diff,
            additions,
            deletions,
        }
    }

    pub fn renamed_from(mut self, old_path: impl Into<PathBuf>) -> Self {
        self.old_path = Some(old_path.into());
        self.kind = ChangeKind::Renamed;
        self
    }

    /// Paths git has to stage for this change (both sides of a rename).
    pub fn stage_paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.path.as_path()).chain(self.old_path.as_deref())
    }
}

/// Count added/removed lines of a unified diff, ignoring file headers.
pub fn count_changes(diff: &str) -> (usize, usize) {
    let mut additions = 0;
    let mut deletions = 0;

    for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            additions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            deletions += 1;
        }
    }

    (additions, deletions)
}

/// Snapshot of the working copy's modifications for one run.
///
/// Files are kept sorted by path and paths are unique; the set is never
/// mutated after construction, only narrowed into new sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<FileChange>,
}

impl ChangeSet {
    pub fn new(mut files: Vec<FileChange>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|later, earlier| later.path == earlier.path);
        Self { files }
    }

    pub fn files(&self) -> &[FileChange] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Keep only the files for which `keep` returns true.
    pub fn retain(&self, mut keep: impl FnMut(&FileChange) -> bool) -> Self {
        Self {
            files: self.files.iter().filter(|f| keep(f)).cloned().collect(),
        }
    }

    /// Keep files equal to, or located under, one of `roots`.
    pub fn restrict_to(&self, roots: &[PathBuf]) -> Self {
        if roots.is_empty() {
            return self.clone();
        }
        let roots: Vec<PathBuf> = roots.iter().map(|r| normalize(r)).collect();
        self.retain(|f| {
            f.stage_paths()
                .any(|p| roots.iter().any(|root| root.as_os_str().is_empty() || p.starts_with(root)))
        })
    }

    /// Every path git knows this change set by, rename sources included.
    pub fn stage_paths(&self) -> HashSet<PathBuf> {
        self.files
            .iter()
            .flat_map(|f| f.stage_paths().map(Path::to_path_buf))
            .collect()
    }
}

/// Strip `./` prefixes and trailing separators so user paths compare
/// against repository-relative ones.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_letters_map_to_kinds() {
        assert_eq!(ChangeKind::from_status("A"), Some(ChangeKind::Added));
        assert_eq!(ChangeKind::from_status("M"), Some(ChangeKind::Modified));
        assert_eq!(ChangeKind::from_status("D"), Some(ChangeKind::Deleted));
        assert_eq!(ChangeKind::from_status("R087"), Some(ChangeKind::Renamed));
        assert_eq!(ChangeKind::from_status("U"), None);
        assert_eq!(ChangeKind::from_status(""), None);
    }

    #[test]
    fn count_changes_skips_headers() {
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1,2 @@\n-old\n+new\n+more\n";
        assert_eq!(count_changes(diff), (2, 1));
    }

    #[test]
    fn restrict_to_matches_directories_and_files() {
        let set = ChangeSet::new(vec![
            FileChange::new("src/a.rs", ChangeKind::Modified, ""),
            FileChange::new("src/b.rs", ChangeKind::Modified, ""),
            FileChange::new("docs/guide.md", ChangeKind::Added, ""),
        ]);

        let only_src = set.restrict_to(&[PathBuf::from("./src/")]);
        assert_eq!(only_src.len(), 2);

        let one_file = set.restrict_to(&[PathBuf::from("docs/guide.md")]);
        assert_eq!(one_file.len(), 1);

        assert_eq!(set.restrict_to(&[]).len(), 3);
    }
}
