// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use console::style;
use dialoguer::{Input, MultiSelect, Select};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{MessageCandidate, Partition, Strategy};
use crate::error::{Error, Result};
use crate::services::gateway::MessageGateway;

/// Answer to a single-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Index into the offered items.
    Choice(usize),
    /// Free text typed by the user instead of picking an item.
    Manual(String),
}

/// Terminal questions the selector needs answered.
pub trait PromptProvider {
    /// Pick any subset of `items`; `defaults` marks the pre-checked ones.
    fn select_many(&self, prompt: &str, items: &[String], defaults: &[bool])
    -> Result<Vec<usize>>;

    /// Pick exactly one item, or type a message when `allow_manual` is set.
    fn select_one(&self, prompt: &str, items: &[String], allow_manual: bool) -> Result<Selection>;
}

/// `PromptProvider` backed by dialoguer on the controlling terminal.
pub struct DialoguerPrompts;

const MANUAL_ITEM: &str = "Enter custom message";

impl PromptProvider for DialoguerPrompts {
    fn select_many(
        &self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>> {
        Ok(MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact()?)
    }

    fn select_one(&self, prompt: &str, items: &[String], allow_manual: bool) -> Result<Selection> {
        let mut shown = items.to_vec();
        if allow_manual {
            shown.push(MANUAL_ITEM.to_string());
        }

        let picked = Select::new()
            .with_prompt(prompt)
            .items(&shown)
            .default(0)
            .interact()?;

        if allow_manual && picked == items.len() {
            let message: String = Input::new()
                .with_prompt("Commit message")
                .validate_with(|input: &String| -> std::result::Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("message cannot be empty")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?;
            return Ok(Selection::Manual(message.trim().to_string()));
        }

        Ok(Selection::Choice(picked))
    }
}

// ─── Strategy & Inclusion ───

fn describe(partition: &Partition) -> String {
    let count = partition.files.len();
    format!(
        "{} ({} {}, +{} -{})",
        partition.label(),
        count,
        if count == 1 { "file" } else { "files" },
        partition.insertions(),
        partition.deletions()
    )
}

/// Ask whether changes spanning several directories go into one commit.
///
/// Returns `Global` or `PerDirectory`.
pub fn choose_strategy(prompts: &dyn PromptProvider, partitions: &[Partition]) -> Result<Strategy> {
    eprintln!();
    eprintln!(
        "{} {} directories with changes:",
        style("→").cyan(),
        partitions.len()
    );
    for partition in partitions {
        eprintln!("  {} {}", style("▸").yellow(), describe(partition));
    }
    eprintln!();

    let items = vec![
        "One commit for all changes".to_string(),
        "Separate commits per directory".to_string(),
    ];

    match prompts.select_one("Commit strategy", &items, false)? {
        Selection::Choice(1) => Ok(Strategy::PerDirectory),
        _ => Ok(Strategy::Global),
    }
}

/// Ask which partitions to commit; all are checked initially.
pub fn choose_partitions(
    prompts: &dyn PromptProvider,
    partitions: &[Partition],
) -> Result<Vec<usize>> {
    let items: Vec<String> = partitions.iter().map(describe).collect();
    let defaults = vec![true; items.len()];

    let picked = prompts.select_many("Directories to commit", &items, &defaults)?;
    Ok(normalize_picks(picked, partitions.len()))
}

/// Ask which single-file partitions to commit.
///
/// With more than one file the user first confirms committing them all; only
/// a "no" opens the per-file checklist, every file checked.
pub fn choose_files(prompts: &dyn PromptProvider, partitions: &[Partition]) -> Result<Vec<usize>> {
    let everything: Vec<usize> = (0..partitions.len()).collect();
    if partitions.len() <= 1 {
        return Ok(everything);
    }

    let confirm = vec!["Yes".to_string(), "No, choose files".to_string()];
    if prompts.select_one("Commit all files?", &confirm, false)? != Selection::Choice(1) {
        return Ok(everything);
    }

    let items: Vec<String> = partitions.iter().map(describe).collect();
    let defaults = vec![true; items.len()];
    let picked = prompts.select_many("Files to commit", &items, &defaults)?;
    Ok(normalize_picks(picked, partitions.len()))
}

fn normalize_picks(mut picked: Vec<usize>, len: usize) -> Vec<usize> {
    picked.retain(|&i| i < len);
    picked.sort_unstable();
    picked.dedup();
    picked
}

// ─── Message Acceptance ───

/// States of the per-partition acceptance loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceState {
    Pending,
    Generating { attempt: usize },
    Presenting { candidates: Vec<MessageCandidate>, attempt: usize },
    Regenerating { attempt: usize },
    ManualOverride(String),
    Accepted(String),
    Skipped,
    /// Generation failed with nobody to ask for a manual message.
    Failed(String),
}

/// Where a partition's acceptance loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted(String),
    Skipped,
    Failed(String),
}

/// Drives message acceptance for one partition at a time.
///
/// Without a prompt provider every question takes its default: the first
/// candidate is accepted and generation failures are final.
pub struct MessageSelector<'a> {
    gateway: &'a MessageGateway,
    prompts: Option<&'a dyn PromptProvider>,
    max_attempts: usize,
}

impl<'a> MessageSelector<'a> {
    pub fn new(
        gateway: &'a MessageGateway,
        prompts: Option<&'a dyn PromptProvider>,
        max_attempts: usize,
    ) -> Self {
        Self {
            gateway,
            prompts,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn accept(&self, partition: &Partition, cancel: &CancellationToken) -> Result<Decision> {
        let mut state = AcceptanceState::Pending;

        loop {
            debug!(label = partition.label(), state = ?state, "acceptance step");

            state = match state {
                AcceptanceState::Pending => AcceptanceState::Generating { attempt: 1 },

                AcceptanceState::Generating { attempt } => {
                    match self.gateway.generate_for(partition, cancel).await {
                        Ok(candidates) => AcceptanceState::Presenting {
                            candidates,
                            attempt,
                        },
                        Err(e) if e.is_generation_failure() => {
                            warn!(label = partition.label(), error = %e, "no message generated");
                            self.after_failure(partition, &e, attempt)?
                        }
                        Err(e) => return Err(e),
                    }
                }

                AcceptanceState::Presenting {
                    candidates,
                    attempt,
                } => self.present(partition, candidates, attempt)?,

                AcceptanceState::Regenerating { attempt } => AcceptanceState::Generating {
                    attempt: attempt + 1,
                },

                AcceptanceState::ManualOverride(message) => {
                    if message.trim().is_empty() {
                        AcceptanceState::Skipped
                    } else {
                        AcceptanceState::Accepted(message.trim().to_string())
                    }
                }

                AcceptanceState::Accepted(message) => return Ok(Decision::Accepted(message)),
                AcceptanceState::Skipped => return Ok(Decision::Skipped),
                AcceptanceState::Failed(reason) => return Ok(Decision::Failed(reason)),
            };
        }
    }

    fn present(
        &self,
        partition: &Partition,
        candidates: Vec<MessageCandidate>,
        attempt: usize,
    ) -> Result<AcceptanceState> {
        let Some(prompts) = self.prompts else {
            return Ok(candidates
                .into_iter()
                .next()
                .map_or(AcceptanceState::Skipped, |c| AcceptanceState::Accepted(c.text)));
        };

        let mut items: Vec<String> = candidates
            .iter()
            .map(|c| format!("{}. {}", c.rank, c.text))
            .collect();
        let regenerate = (attempt < self.max_attempts).then(|| {
            items.push(format!("Regenerate ({}/{})", attempt, self.max_attempts));
            items.len() - 1
        });
        items.push("Skip this commit".to_string());

        let prompt = if candidates.len() > 1 {
            format!("Select commit message for '{}'", partition.label())
        } else {
            format!("Confirm commit message for '{}'", partition.label())
        };

        Ok(match prompts.select_one(&prompt, &items, true)? {
            Selection::Manual(message) => AcceptanceState::ManualOverride(message),
            Selection::Choice(i) if i < candidates.len() => {
                AcceptanceState::Accepted(candidates[i].text.clone())
            }
            Selection::Choice(i) if Some(i) == regenerate => {
                AcceptanceState::Regenerating { attempt }
            }
            Selection::Choice(_) => AcceptanceState::Skipped,
        })
    }

    fn after_failure(&self, partition: &Partition, error: &Error, attempt: usize) -> Result<AcceptanceState> {
        let Some(prompts) = self.prompts else {
            return Ok(AcceptanceState::Failed(error.to_string()));
        };

        eprintln!("{} {}", style("warning:").yellow().bold(), error);

        let mut items = Vec::new();
        let retry = (attempt < self.max_attempts).then(|| {
            items.push(format!("Try again ({}/{})", attempt, self.max_attempts));
            items.len() - 1
        });
        items.push("Skip this commit".to_string());

        let prompt = format!("No message generated for '{}'", partition.label());
        Ok(match prompts.select_one(&prompt, &items, true)? {
            Selection::Manual(message) => AcceptanceState::ManualOverride(message),
            Selection::Choice(i) if Some(i) == retry => AcceptanceState::Regenerating { attempt },
            Selection::Choice(_) => AcceptanceState::Skipped,
        })
    }
}
