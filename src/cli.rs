// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::Parser;

use crate::config::Provider;
use crate::domain::CommitStyle;

#[derive(Parser, Debug, Default)]
#[command(name = "devcommit")]
#[command(version)]
#[command(about = "AI-generated commits, split per directory when it helps", long_about = None)]
pub struct Cli {
    /// Commit all tracked working-tree changes, not just the staged ones
    #[arg(short = 's', long)]
    pub stage_all: bool,

    /// One commit per top-level directory (`--directory=false` forces one commit)
    #[arg(
        short = 'd',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub directory: Option<bool>,

    /// Glob patterns to leave out (added to the configured ones)
    #[arg(short = 'e', long, value_name = "GLOB", num_args = 1.., value_delimiter = ',')]
    pub exclude_files: Vec<String>,

    /// Number of candidate messages to generate
    #[arg(short = 'g', long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub generate: Option<u8>,

    /// Message style
    #[arg(short = 't', long, value_enum)]
    pub commit_type: Option<CommitStyle>,

    /// Language of the generated messages, e.g. en-US
    #[arg(short = 'l', long)]
    pub locale: Option<String>,

    /// Only commit changes under these files or directories
    #[arg(short = 'f', long, value_name = "PATH", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Generation service
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Push after committing
    #[arg(short = 'p', long)]
    pub push: bool,

    /// Never prompt: accept the first candidate for every commit
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Extra arguments passed to every `git commit`
    #[arg(last = true, value_name = "GIT_ARGS")]
    pub git_args: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
