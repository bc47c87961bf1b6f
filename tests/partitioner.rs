// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod helpers;

use std::collections::HashSet;
use std::path::PathBuf;

use devcommit::domain::{ChangeKind, ChangeSet, PartitionKey};
use devcommit::services::exclusion::ExclusionFilter;
use devcommit::services::partitioner::DirectoryPartitioner;
use helpers::{make_change_set, make_file_change};
use proptest::prelude::*;

// ─── Grouping ────────────────────────────────────────────────────────────────

#[test]
fn groups_by_first_segment_sorted_by_key() {
    let changes = make_change_set(&["src/b.py", "docs/readme.md", "src/a.py"]);
    let partitions = DirectoryPartitioner::partition(&changes);

    let labels: Vec<&str> = partitions.iter().map(|p| p.label()).collect();
    assert_eq!(labels, vec!["docs", "src"]);
    assert_eq!(partitions[0].files.len(), 1);
    assert_eq!(
        partitions[1].paths(),
        vec![PathBuf::from("src/a.py"), PathBuf::from("src/b.py")]
    );
}

#[test]
fn root_files_share_the_global_partition() {
    let changes = make_change_set(&["README.md", "Cargo.toml", "src/lib.rs"]);
    let partitions = DirectoryPartitioner::partition(&changes);

    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].key, PartitionKey::Global);
    assert_eq!(partitions[0].files.len(), 2);
    assert_eq!(partitions[1].label(), "src");
}

#[test]
fn directory_named_global_stays_separate() {
    let changes = make_change_set(&["global/config.rs", "notes.txt"]);
    let partitions = DirectoryPartitioner::partition(&changes);

    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].key, PartitionKey::Global);
    assert_eq!(partitions[1].key, PartitionKey::Directory("global".into()));
}

#[test]
fn partition_members_follow_path_order() {
    let changes = ChangeSet::new(vec![
        make_file_change("src/z.rs", ChangeKind::Modified),
        make_file_change("src/a.rs", ChangeKind::Added),
    ]);
    let partitions = DirectoryPartitioner::partition(&changes);

    assert_eq!(
        partitions[0].paths(),
        vec![PathBuf::from("src/a.rs"), PathBuf::from("src/z.rs")]
    );
}

#[test]
fn partition_diff_concatenates_in_path_order() {
    let changes = ChangeSet::new(vec![
        make_file_change("src/z.rs", ChangeKind::Modified),
        make_file_change("src/a.rs", ChangeKind::Added),
    ]);
    let partitions = DirectoryPartitioner::partition(&changes);
    let diff = &partitions[0].diff;

    let a = diff.find("src/a.rs").unwrap();
    let z = diff.find("src/z.rs").unwrap();
    assert!(a < z, "diff should follow path order");
}

#[test]
fn root_label_differs_from_a_directory_named_global() {
    let changes = make_change_set(&["global/config.rs", "notes.txt"]);
    let labels: Vec<String> = DirectoryPartitioner::partition(&changes)
        .iter()
        .map(|p| p.label().to_string())
        .collect();

    assert_eq!(labels, vec!["(root)", "global"]);
}

#[test]
fn empty_change_set_has_no_partitions() {
    assert!(DirectoryPartitioner::partition(&ChangeSet::default()).is_empty());
}

// ─── Exclusion + partitioning scenario ───────────────────────────────────────

#[test]
fn excluded_lock_file_never_reaches_a_partition() {
    let changes = make_change_set(&["src/a.py", "src/b.py", "docs/readme.md", "poetry.lock"]);
    let filter = ExclusionFilter::new(&["*.lock"]).unwrap();
    let partitions = DirectoryPartitioner::partition(&filter.apply(&changes));

    let summary: Vec<(&str, usize)> = partitions
        .iter()
        .map(|p| (p.label(), p.files.len()))
        .collect();
    assert_eq!(summary, vec![("docs", 1), ("src", 2)]);
}

// ─── Properties ──────────────────────────────────────────────────────────────

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn partitions_are_disjoint_and_cover_the_input(paths in prop::collection::vec(path_strategy(), 0..20)) {
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let changes = make_change_set(&refs);
        let partitions = DirectoryPartitioner::partition(&changes);

        let mut seen: HashSet<PathBuf> = HashSet::new();
        for partition in &partitions {
            for path in partition.paths() {
                prop_assert!(seen.insert(path), "path in two partitions");
            }
        }

        let input: HashSet<PathBuf> = changes.paths().map(|p| p.to_path_buf()).collect();
        prop_assert_eq!(seen, input);
    }

    #[test]
    fn partition_keys_are_strictly_ascending(paths in prop::collection::vec(path_strategy(), 0..20)) {
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let partitions = DirectoryPartitioner::partition(&make_change_set(&refs));

        for pair in partitions.windows(2) {
            prop_assert!(pair[0].key < pair[1].key);
        }
    }
}
