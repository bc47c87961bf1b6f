// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;

use console::style;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::{OutcomeStatus, RunNote, RunReport};
use crate::error::{Error, Result};
use crate::services::{
    exclusion::ExclusionFilter,
    gateway::MessageGateway,
    git::{GitService, SourceMode},
    llm,
    orchestrator::{Orchestrator, RunOptions},
    selector::DialoguerPrompts,
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            provider = %config.provider,
            model = config.model_name(),
            commit_mode = %config.commit_mode,
            exclude = ?config.exclude_files,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    /// Run the requested command and return the process exit code.
    pub async fn run(&mut self) -> Result<i32> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            self.handle_command(cmd)?;
            return Ok(0);
        }

        self.commit_changes().await
    }

    async fn commit_changes(&self) -> Result<i32> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let git = GitService::discover()?;
        let exclusion = ExclusionFilter::new(&self.config.exclude_files)?;
        let interactive = self.is_interactive();

        let provider = llm::create_provider(&self.config)?;
        let gateway = MessageGateway::new(
            provider,
            self.config.generation_options(),
            self.config.max_diff_chars,
        )
        .with_progress(std::io::stderr().is_terminal());

        let mode = if self.cli.stage_all {
            SourceMode::WorkingTree
        } else {
            SourceMode::Staged
        };

        self.print_status(match mode {
            SourceMode::Staged => "Reading staged changes...",
            SourceMode::WorkingTree => "Reading working tree changes...",
        });

        let options = RunOptions {
            mode,
            files: self.cli.files.clone(),
            directory_flag: self.cli.directory,
            commit_mode: self.config.commit_mode,
            commit_args: self.cli.git_args.clone(),
            max_attempts: self.config.max_attempts,
            show_progress: true,
        };

        let prompts = DialoguerPrompts;
        let mut orchestrator = Orchestrator::new(&git, &git, &gateway, exclusion, options);
        if interactive {
            orchestrator = orchestrator.with_prompts(&prompts);
        }

        let report = match orchestrator.run(&self.cancel_token).await {
            Ok(report) => report,
            Err(Error::NoChanges) => {
                self.print_info(if self.cli.stage_all {
                    "No tracked changes to commit"
                } else {
                    "No staged changes. Stage files with: git add <files>, or pass --stage-all"
                });
                return Ok(0);
            }
            Err(Error::UnstagedOverlap { paths }) => {
                self.print_warning("Cannot split: some staged files also have unstaged changes:");
                for path in &paths {
                    eprintln!("  {}", path.display());
                }
                return Err(Error::UnstagedOverlap { paths });
            }
            Err(e) => return Err(e),
        };

        self.print_report(&report);

        if self.cli.push {
            if report.committed_count() > 0 {
                self.print_status("Pushing...");
                git.push().await?;
                eprintln!("{} Pushed", style("✓").green().bold());
            } else {
                self.print_warning("No commits were made, skipping push");
            }
        }

        Ok(report.exit_code())
    }

    fn is_interactive(&self) -> bool {
        !self.cli.yes && std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
    }

    fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                let rendered = toml::to_string_pretty(&self.config.redacted())
                    .map_err(|e| Error::Config(e.to_string()))?;
                print!("{rendered}");
                Ok(())
            }
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "devcommit", &mut std::io::stdout());
                Ok(())
            }
        }
    }

    // ─── Report ───

    fn print_report(&self, report: &RunReport) {
        match report.note {
            Some(RunNote::NothingToCommit) => {
                self.print_info("Every change matches an exclude pattern; nothing to commit");
                return;
            }
            Some(RunNote::NoPartitionsSelected) => {
                self.print_info("No directories selected; nothing committed");
                return;
            }
            None => {}
        }

        eprintln!();
        for outcome in &report.outcomes {
            let subject = outcome
                .message
                .as_deref()
                .and_then(|m| m.lines().next())
                .unwrap_or("");

            match &outcome.status {
                OutcomeStatus::Committed => eprintln!(
                    "{} [{}] {}",
                    style("✓").green().bold(),
                    outcome.label,
                    style(subject).green()
                ),
                OutcomeStatus::Skipped => eprintln!(
                    "{} [{}] skipped ({} files left uncommitted)",
                    style("-").dim(),
                    outcome.label,
                    outcome.files.len()
                ),
                OutcomeStatus::Failed(reason) => {
                    eprintln!(
                        "{} [{}] {}",
                        style("✗").red().bold(),
                        outcome.label,
                        style(reason).red()
                    );
                    if outcome.retained_commits > 0 {
                        eprintln!(
                            "    {} earlier commit(s) from this run remain in history",
                            outcome.retained_commits
                        );
                    }
                }
            }
        }

        if report.cancelled {
            self.print_warning("Interrupted; remaining commits were skipped");
        }

        let committed = report.committed_count();
        let failed = report.failed_count();
        eprintln!();
        if failed == 0 && committed > 0 {
            eprintln!(
                "{} {} commit{} created",
                style("✓").green().bold(),
                committed,
                if committed == 1 { "" } else { "s" }
            );
        } else if failed > 0 {
            self.print_warning(&format!(
                "{committed} committed, {failed} failed, {} skipped",
                report.skipped_count()
            ));
        } else {
            self.print_info("Nothing committed");
        }
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}
