// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::collections::BTreeSet;
use std::path::PathBuf;

use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{
    ChangeSet, CommitMode, CommitOutcome, Partition, RunNote, RunReport, Strategy,
};
use crate::error::{Error, Result};
use crate::services::exclusion::ExclusionFilter;
use crate::services::gateway::MessageGateway;
use crate::services::git::{ChangeSource, CommitTarget, SourceMode};
use crate::services::partitioner::DirectoryPartitioner;
use crate::services::selector::{
    Decision, MessageSelector, PromptProvider, choose_files, choose_partitions, choose_strategy,
};
use crate::services::sequencer::{
    AcceptedPartition, CommitSequencer, SequencerOptions, StageSource,
};
use crate::services::strategy::StrategyResolver;

/// Per-run inputs that do not come from the configuration file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: SourceMode,
    /// Restrict the run to these files or directories (empty: everything).
    pub files: Vec<PathBuf>,
    /// `--directory` as given on the command line.
    pub directory_flag: Option<bool>,
    /// Commit mode from the configuration chain.
    pub commit_mode: CommitMode,
    pub commit_args: Vec<String>,
    pub max_attempts: usize,
    /// Print per-partition progress lines on stderr.
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: SourceMode::Staged,
            files: Vec::new(),
            directory_flag: None,
            commit_mode: CommitMode::Auto,
            commit_args: Vec::new(),
            max_attempts: 3,
            show_progress: false,
        }
    }
}

/// End-to-end run: changes in, `RunReport` out.
pub struct Orchestrator<'a> {
    source: &'a dyn ChangeSource,
    target: &'a dyn CommitTarget,
    gateway: &'a MessageGateway,
    prompts: Option<&'a dyn PromptProvider>,
    exclusion: ExclusionFilter,
    options: RunOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        source: &'a dyn ChangeSource,
        target: &'a dyn CommitTarget,
        gateway: &'a MessageGateway,
        exclusion: ExclusionFilter,
        options: RunOptions,
    ) -> Self {
        Self {
            source,
            target,
            gateway,
            prompts: None,
            exclusion,
            options,
        }
    }

    /// Ask the user through `prompts`; without one the run never blocks on
    /// input.
    pub fn with_prompts(mut self, prompts: &'a dyn PromptProvider) -> Self {
        self.prompts = Some(prompts);
        self
    }

    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunReport> {
        // ─── Collect ───

        let changes = self.source.current_changes(self.options.mode).await?;
        let scoped = changes.restrict_to(&self.options.files);
        if scoped.is_empty() {
            debug!(roots = ?self.options.files, "no changes under the requested paths");
            return Err(Error::NoChanges);
        }

        let filtered = self.exclusion.apply(&scoped);
        if filtered.is_empty() {
            info!(files = scoped.len(), "every change is excluded");
            return Ok(RunReport::empty(RunNote::NothingToCommit));
        }

        // ─── Decide ───

        let partitions = DirectoryPartitioner::partition(&filtered);
        let strategy = StrategyResolver::resolve(
            self.options.directory_flag,
            self.options.commit_mode,
            partitions.len(),
        );
        debug!(%strategy, partitions = partitions.len(), "strategy resolved");

        let selected = self.select_partitions(strategy, &filtered, partitions)?;
        if selected.is_empty() {
            return Ok(RunReport {
                strategy: Some(strategy),
                note: Some(RunNote::NoPartitionsSelected),
                ..RunReport::default()
            });
        }

        let mut slots: Vec<Option<CommitOutcome>> = vec![None; selected.len()];
        let mut accepted: Vec<(usize, AcceptedPartition)> = Vec::new();
        let selector = MessageSelector::new(self.gateway, self.prompts, self.options.max_attempts);

        for (index, partition) in selected.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if self.options.show_progress {
                eprintln!(
                    "{} Generating message for '{}' ({}/{})...",
                    style("→").cyan(),
                    partition.label(),
                    index + 1,
                    selected.len()
                );
            }

            match selector.accept(partition, cancel).await? {
                Decision::Accepted(message) => accepted.push((
                    index,
                    AcceptedPartition {
                        partition: partition.clone(),
                        message,
                    },
                )),
                Decision::Skipped => slots[index] = Some(CommitOutcome::skipped(partition)),
                Decision::Failed(reason) => {
                    slots[index] = Some(CommitOutcome::failed(partition, None, reason));
                }
            }
        }

        // ─── Commit ───

        let mut report = RunReport {
            strategy: Some(strategy),
            ..RunReport::default()
        };

        if !accepted.is_empty() {
            let options = self.sequencer_options(&changes, &accepted).await?;
            let (indices, accepted): (Vec<usize>, Vec<AcceptedPartition>) =
                accepted.into_iter().unzip();

            let sequenced = CommitSequencer::new(self.target, options)
                .run(accepted, cancel)
                .await;

            report.cancelled = sequenced.cancelled;
            for (index, outcome) in indices.into_iter().zip(sequenced.outcomes) {
                slots[index] = Some(outcome);
            }
        }

        report.outcomes = slots.into_iter().flatten().collect();
        Ok(report)
    }

    /// Partitions that go on to message generation, in key order.
    ///
    /// Separate commits for an explicit `files` list mean one commit per file
    /// rather than per root directory.
    fn select_partitions(
        &self,
        strategy: Strategy,
        filtered: &ChangeSet,
        partitions: Vec<Partition>,
    ) -> Result<Vec<Partition>> {
        let per_directory = match (strategy, self.prompts) {
            (Strategy::Global, _) => false,
            (Strategy::PerDirectory, _) => true,
            // nobody to ask: one commit is the least surprising choice
            (Strategy::InteractivePrompt, None) => false,
            (Strategy::InteractivePrompt, Some(prompts)) => {
                choose_strategy(prompts, &partitions)? == Strategy::PerDirectory
            }
        };

        if !per_directory {
            return Ok(vec![Partition::global(filtered)]);
        }

        let per_file = !self.options.files.is_empty();
        let partitions = if per_file {
            DirectoryPartitioner::per_file(filtered)
        } else {
            partitions
        };

        let Some(prompts) = self.prompts else {
            return Ok(partitions);
        };

        let picked = if per_file {
            choose_files(prompts, &partitions)?
        } else {
            choose_partitions(prompts, &partitions)?
        };
        debug!(offered = partitions.len(), picked = picked.len(), "partitions selected");

        Ok(partitions
            .into_iter()
            .enumerate()
            .filter(|(i, _)| picked.contains(i))
            .map(|(_, p)| p)
            .collect())
    }

    /// Decide how the sequencer treats the index.
    ///
    /// Commits are isolated whenever the accepted files are not exactly the
    /// change set the source reported. In staged mode isolation resets the
    /// index, which would lose unstaged edits layered on staged files, so
    /// that case aborts before anything is committed.
    async fn sequencer_options(
        &self,
        changes: &ChangeSet,
        accepted: &[(usize, AcceptedPartition)],
    ) -> Result<SequencerOptions> {
        let everything = changes.stage_paths();
        let accepted_paths: std::collections::HashSet<PathBuf> = accepted
            .iter()
            .flat_map(|(_, a)| a.partition.stage_paths())
            .collect();

        let isolate = accepted.len() > 1 || accepted_paths != everything;
        let staged_mode = self.options.mode == SourceMode::Staged;

        let mut restore = BTreeSet::new();
        if isolate && staged_mode {
            let mut overlap: Vec<PathBuf> = self
                .source
                .unstaged_paths()
                .await?
                .into_iter()
                .filter(|p| everything.contains(p))
                .collect();
            if !overlap.is_empty() {
                overlap.sort();
                return Err(Error::UnstagedOverlap { paths: overlap });
            }
            restore = everything.into_iter().collect();
        }

        debug!(isolate, staged_mode, "sequencer prepared");

        let source = if staged_mode {
            StageSource::Index
        } else {
            StageSource::WorkingTree
        };

        Ok(SequencerOptions {
            isolate,
            source,
            restore,
            commit_args: self.options.commit_args.clone(),
        })
    }
}
