// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::collections::BTreeMap;
use std::path::{Component, Path};

use tracing::debug;

use crate::domain::{ChangeSet, FileChange, Partition, PartitionKey};

/// Groups changed files by their top-level directory.
pub struct DirectoryPartitioner;

impl DirectoryPartitioner {
    /// Split `changes` into one partition per root directory, sorted by key.
    ///
    /// Files directly in the repository root share the `(root)` partition.
    /// Every file lands in exactly one partition.
    pub fn partition(changes: &ChangeSet) -> Vec<Partition> {
        let mut groups: BTreeMap<PartitionKey, Vec<FileChange>> = BTreeMap::new();

        for file in changes.files() {
            groups
                .entry(Self::key_for(&file.path))
                .or_default()
                .push(file.clone());
        }

        let partitions: Vec<Partition> = groups
            .into_iter()
            .map(|(key, files)| Partition::new(key, files))
            .collect();

        debug!(
            files = changes.len(),
            partitions = partitions.len(),
            labels = ?partitions.iter().map(Partition::label).collect::<Vec<_>>(),
            "changes partitioned"
        );

        partitions
    }

    /// One partition per file, sorted by path. Used when the user named the
    /// files to commit and asked for separate commits.
    pub fn per_file(changes: &ChangeSet) -> Vec<Partition> {
        let mut partitions: Vec<Partition> = changes
            .files()
            .iter()
            .map(|file| {
                let key = PartitionKey::File(file.path.to_string_lossy().into_owned());
                Partition::new(key, vec![file.clone()])
            })
            .collect();
        partitions.sort_by(|a, b| a.key.cmp(&b.key));

        debug!(partitions = partitions.len(), "changes split per file");
        partitions
    }

    /// First path segment, or the global key for root-level files.
    pub fn key_for(path: &Path) -> PartitionKey {
        let mut segments = path.components().filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        });

        match (segments.next(), segments.next()) {
            (Some(first), Some(_)) => PartitionKey::Directory(first.to_string_lossy().into_owned()),
            _ => PartitionKey::Global,
        }
    }
}
