// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeSet;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{CommitOutcome, Partition, RunReport};
use crate::error::Result;
use crate::services::git::{CommitTarget, IndexSnapshot};

/// A partition together with the message the user settled on.
#[derive(Debug, Clone)]
pub struct AcceptedPartition {
    pub partition: Partition,
    pub message: String,
}

/// Where a partition's content comes from when it is staged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageSource {
    /// Entries already in the index. They are copied from a snapshot taken
    /// before the first reset, so staged deletions survive isolation.
    #[default]
    Index,
    /// The working tree (stage-all mode). Partitions are always staged.
    WorkingTree,
}

/// How the index is prepared before each commit.
#[derive(Debug, Clone, Default)]
pub struct SequencerOptions {
    /// Reset the index before every partition so each commit holds only
    /// that partition's files.
    pub isolate: bool,
    pub source: StageSource,
    /// Paths staged before the run; whatever was not committed is staged
    /// again from the snapshot once the sequence ends.
    pub restore: BTreeSet<PathBuf>,
    /// Extra arguments for every `git commit`.
    pub commit_args: Vec<String>,
}

/// Creates one commit per accepted partition, strictly in order.
///
/// Only the sequencer writes to the index or history. A failed partition is
/// recorded and the sequence moves on; commits made before it stay.
pub struct CommitSequencer<'a> {
    target: &'a dyn CommitTarget,
    options: SequencerOptions,
}

impl<'a> CommitSequencer<'a> {
    pub fn new(target: &'a dyn CommitTarget, options: SequencerOptions) -> Self {
        Self { target, options }
    }

    pub async fn run(
        &self,
        accepted: Vec<AcceptedPartition>,
        cancel: &CancellationToken,
    ) -> RunReport {
        let mut report = RunReport::default();
        let mut committed_paths: BTreeSet<PathBuf> = BTreeSet::new();
        let mut committed = 0;

        let snapshot = if self.uses_snapshot() {
            match self.target.snapshot_index().await {
                Ok(snapshot) => {
                    debug!(tree = %snapshot.0, "index snapshot taken");
                    Some(snapshot)
                }
                Err(e) => {
                    // nothing has been reset yet, so the index is untouched
                    warn!(error = %e, "cannot snapshot the index");
                    let reason = e.to_string();
                    report.outcomes = accepted
                        .into_iter()
                        .map(|a| {
                            CommitOutcome::failed(&a.partition, Some(a.message), reason.clone())
                        })
                        .collect();
                    return report;
                }
            }
        } else {
            None
        };

        for AcceptedPartition { partition, message } in accepted {
            // interrupts are honored between partitions only
            if cancel.is_cancelled() {
                if !report.cancelled {
                    warn!(label = partition.label(), "interrupted, skipping remaining commits");
                }
                report.cancelled = true;
                report.outcomes.push(CommitOutcome::skipped(&partition));
                continue;
            }

            match self.commit_one(&partition, &message, snapshot.as_ref()).await {
                Ok(()) => {
                    info!(label = partition.label(), files = partition.files.len(), "committed");
                    committed += 1;
                    committed_paths.extend(partition.stage_paths());
                    report
                        .outcomes
                        .push(CommitOutcome::committed(&partition, message));
                }
                Err(e) => {
                    warn!(label = partition.label(), error = %e, "commit failed");
                    let mut outcome = CommitOutcome::failed(&partition, Some(message), e.to_string());
                    outcome.retained_commits = committed;
                    report.outcomes.push(outcome);
                }
            }
        }

        if let Some(snapshot) = &snapshot {
            self.restore_index(snapshot, &committed_paths).await;
        }
        report
    }

    fn uses_snapshot(&self) -> bool {
        self.options.isolate && self.options.source == StageSource::Index
    }

    async fn commit_one(
        &self,
        partition: &Partition,
        message: &str,
        snapshot: Option<&IndexSnapshot>,
    ) -> Result<()> {
        if self.options.isolate {
            self.target.unstage_all().await?;
        }
        match (snapshot, self.options.source) {
            (Some(snapshot), _) => {
                self.target
                    .stage_from(snapshot, &partition.stage_paths())
                    .await?;
            }
            (None, StageSource::WorkingTree) => {
                self.target.stage(&partition.stage_paths()).await?;
            }
            (None, StageSource::Index) => {}
        }
        self.target.commit(message, &self.options.commit_args).await
    }

    async fn restore_index(&self, snapshot: &IndexSnapshot, committed: &BTreeSet<PathBuf>) {
        if self.options.restore.is_empty() {
            return;
        }

        let pending: Vec<PathBuf> = self
            .options
            .restore
            .difference(committed)
            .cloned()
            .collect();

        if let Err(e) = self.target.unstage_all().await {
            warn!(error = %e, "could not reset index after commits");
        }
        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(), "restaging files left uncommitted");
        if let Err(e) = self.target.stage_from(snapshot, &pending).await {
            warn!(
                error = %e,
                tree = %snapshot.0,
                "could not restage uncommitted files; `git reset <tree> -- <paths>` recovers them"
            );
        }
    }
}
