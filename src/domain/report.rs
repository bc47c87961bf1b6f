// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::PathBuf;

use super::{Partition, Strategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Committed,
    Skipped,
    Failed(String),
}

/// Terminal record for one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub label: String,
    pub files: Vec<PathBuf>,
    pub message: Option<String>,
    pub status: OutcomeStatus,
    /// Commits created earlier in the run that stay in history after this
    /// partition failed. Always zero unless `status` is `Failed`.
    pub retained_commits: usize,
}

impl CommitOutcome {
    pub fn committed(partition: &Partition, message: impl Into<String>) -> Self {
        Self::with_status(partition, Some(message.into()), OutcomeStatus::Committed)
    }

    pub fn skipped(partition: &Partition) -> Self {
        Self::with_status(partition, None, OutcomeStatus::Skipped)
    }

    pub fn failed(partition: &Partition, message: Option<String>, reason: impl Into<String>) -> Self {
        Self::with_status(partition, message, OutcomeStatus::Failed(reason.into()))
    }

    fn with_status(partition: &Partition, message: Option<String>, status: OutcomeStatus) -> Self {
        Self {
            label: partition.label().to_string(),
            files: partition.paths(),
            message,
            status,
            retained_commits: 0,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.status == OutcomeStatus::Committed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }
}

/// Why a run finished without attempting any commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunNote {
    /// Every change was removed by the exclusion patterns.
    NothingToCommit,
    /// The user deselected every partition.
    NoPartitionsSelected,
}

/// What happened to every partition in a run, in partition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub strategy: Option<Strategy>,
    pub outcomes: Vec<CommitOutcome>,
    pub note: Option<RunNote>,
    /// Set when a user interrupt stopped the run between partitions.
    pub cancelled: bool,
}

impl RunReport {
    pub fn empty(note: RunNote) -> Self {
        Self {
            note: Some(note),
            ..Self::default()
        }
    }

    pub fn committed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_committed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Skipped)
            .count()
    }

    /// 0 when nothing failed, 130 when interrupted mid-sequence, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed_count() > 0 {
            1
        } else if self.cancelled {
            130
        } else {
            0
        }
    }
}
