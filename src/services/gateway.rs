// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{FileChange, GenerationOptions, MessageCandidate, Partition};
use crate::error::{Error, Result};
use crate::services::llm::LlmProvider;
use crate::services::prompt::PromptBuilder;
use crate::services::sanitizer::CandidateParser;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Boundary to the generation service: shapes the request, calls the
/// provider, and turns the reply into ranked candidates.
pub struct MessageGateway {
    provider: Box<dyn LlmProvider>,
    options: GenerationOptions,
    max_diff_chars: usize,
    retry_delay: Duration,
    show_progress: bool,
}

impl MessageGateway {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        options: GenerationOptions,
        max_diff_chars: usize,
    ) -> Self {
        Self {
            provider,
            options,
            max_diff_chars,
            retry_delay: DEFAULT_RETRY_DELAY,
            show_progress: false,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Show a spinner on stderr while waiting for the service.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Candidates for an already assembled diff text.
    pub async fn generate(
        &self,
        diff: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MessageCandidate>> {
        self.request(&[], diff, cancel).await
    }

    /// Candidates for one partition. Its concatenated diff goes out as is
    /// when it fits; oversized diffs are shaped per file.
    pub async fn generate_for(
        &self,
        partition: &Partition,
        cancel: &CancellationToken,
    ) -> Result<Vec<MessageCandidate>> {
        let shaped;
        let diff = if partition.diff.len() <= self.max_diff_chars {
            partition.diff.as_str()
        } else {
            shaped = shape_diff(&partition.files, self.max_diff_chars);
            shaped.as_str()
        };
        debug!(
            label = partition.label(),
            files = partition.files.len(),
            raw_chars = partition.diff.len(),
            sent_chars = diff.len(),
            "requesting candidates"
        );
        self.request(&partition.files, diff, cancel).await
    }

    async fn request(
        &self,
        files: &[FileChange],
        diff: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MessageCandidate>> {
        let system = PromptBuilder::system(&self.options);
        let prompt = PromptBuilder::user(files, diff);

        match self.attempt(&system, &prompt, cancel).await {
            Err(e) if e.is_generation_failure() => {
                warn!(provider = self.provider_name(), error = %e, "generation failed, retrying once");

                tokio::select! {
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(self.retry_delay) => {}
                }

                self.attempt(&system, &prompt, cancel).await
            }
            other => other,
        }
    }

    async fn attempt(
        &self,
        system: &str,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<MessageCandidate>> {
        let spinner = self.show_progress.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!(
                "Generating with {} ({})...",
                self.provider_name(),
                self.options.model
            ));
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });

        let raw = self.provider.generate(system, prompt, cancel.clone()).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let raw = raw?;
        let candidates = CandidateParser::parse(&raw, self.options.count);
        debug!(
            raw_len = raw.len(),
            candidates = candidates.len(),
            "response parsed"
        );

        if candidates.is_empty() {
            return Err(Error::GenerationUnavailable {
                provider: self.provider_name().into(),
                message: "response contained no usable commit message".into(),
            });
        }

        Ok(candidates)
    }
}

/// Fit the files' diffs into `budget` characters.
///
/// The largest diffs are replaced first by a one-line summary until the
/// total fits. Every file keeps at least its summary line, even when the
/// summaries alone exceed the budget. Output follows the input order.
pub fn shape_diff(files: &[FileChange], budget: usize) -> String {
    let mut pieces: Vec<String> = files
        .iter()
        .map(|f| f.diff.trim_end_matches('\n').to_string())
        .collect();

    let total = |pieces: &[String]| -> usize {
        pieces.iter().map(|p| p.len()).sum::<usize>() + pieces.len().saturating_sub(1)
    };

    if total(&pieces) > budget {
        let mut by_size: Vec<usize> = (0..files.len()).collect();
        // largest first; path order breaks ties so output is deterministic
        by_size.sort_by(|&a, &b| {
            files[b]
                .diff
                .len()
                .cmp(&files[a].diff.len())
                .then_with(|| files[a].path.cmp(&files[b].path))
        });

        for index in by_size {
            if total(&pieces) <= budget {
                break;
            }
            let file = &files[index];
            let summary = format!(
                "{} {} (+{} -{}, diff omitted)",
                file.kind,
                file.path.display(),
                file.additions,
                file.deletions
            );
            if summary.len() < pieces[index].len() {
                pieces[index] = summary;
            }
        }
    }

    pieces
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
