// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::domain::{ChangeSet, FileChange};
use crate::error::{Error, Result};

/// Removes files matching the configured glob patterns.
///
/// Patterns follow shell rules: one without a `/` is matched against the file
/// name alone (so `*.lock` hits lock files at any depth), one with a `/` is
/// matched against the whole repository-relative path and its `*` never
/// crosses a separator. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    by_name: GlobSet,
    by_path: GlobSet,
    pattern_count: usize,
}

impl ExclusionFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut by_name = GlobSetBuilder::new();
        let mut by_path = GlobSetBuilder::new();
        let mut pattern_count = 0;

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }

            if pattern.contains('/') {
                // "dist/**" and "/dist/**" mean the same thing here
                let anchored = pattern.trim_start_matches('/');
                by_path.add(build(anchored, true)?);
            } else {
                by_name.add(build(pattern, false)?);
            }
            pattern_count += 1;
        }

        Ok(Self {
            by_name: by_name.build().map_err(|e| Error::Config(e.to_string()))?,
            by_path: by_path.build().map_err(|e| Error::Config(e.to_string()))?,
            pattern_count,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.by_path.is_match(path) {
            return true;
        }
        path.file_name()
            .is_some_and(|name| self.by_name.is_match(Path::new(name)))
    }

    fn excludes(&self, file: &FileChange) -> bool {
        self.is_excluded(&file.path)
    }

    /// Narrow `changes` to the files no pattern matches.
    pub fn apply(&self, changes: &ChangeSet) -> ChangeSet {
        if self.is_empty() {
            return changes.clone();
        }

        let kept = changes.retain(|f| {
            let excluded = self.excludes(f);
            if excluded {
                debug!(path = %f.path.display(), "excluded");
            }
            !excluded
        });

        debug!(
            before = changes.len(),
            after = kept.len(),
            "exclusion filter applied"
        );
        kept
    }
}

fn build(pattern: &str, literal_separator: bool) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(literal_separator)
        .case_insensitive(false)
        .build()
        .map_err(|e| Error::Config(format!("invalid exclude pattern '{pattern}': {e}")))
}
