// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Cannot read repository changes: {0}")]
    #[diagnostic(
        code(devcommit::git::unavailable),
        help("Run this command inside a git repository with git on your PATH")
    )]
    SourceUnavailable(String),

    #[error("No changes found")]
    #[diagnostic(
        code(devcommit::git::no_changes),
        help("Stage files with: git add <files>, or pass --stage-all")
    )]
    NoChanges,

    #[error("Merge in progress")]
    #[diagnostic(
        code(devcommit::git::merge),
        help("Complete or abort the merge: git merge --abort")
    )]
    MergeInProgress,

    #[error("Cannot split commits: {} staged file(s) also have unstaged edits", paths.len())]
    #[diagnostic(
        code(devcommit::split::unstaged_overlap),
        help("Stash or stage the remaining edits first, or rerun with --stage-all")
    )]
    UnstagedOverlap { paths: Vec<PathBuf> },

    #[error("Generation service '{provider}' unavailable: {message}")]
    #[diagnostic(code(devcommit::generation::unavailable))]
    GenerationUnavailable { provider: String, message: String },

    #[error("Generation service '{provider}' refused the request: {message}")]
    #[diagnostic(
        code(devcommit::generation::quota),
        help("Check your API key and usage limits")
    )]
    GenerationQuota { provider: String, message: String },

    #[error("Git error: {0}")]
    #[diagnostic(code(devcommit::git::error))]
    Git(String),

    #[error("Push failed: {0}")]
    #[diagnostic(
        code(devcommit::git::push),
        help("Commits were created locally; push manually with: git push")
    )]
    Push(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(devcommit::config::error))]
    Config(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl Error {
    /// Failures of the generation service that the gateway may retry once.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::GenerationUnavailable { .. } | Self::GenerationQuota { .. }
        )
    }
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                Error::Cancelled
            }
            other => Error::Dialog(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
