// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of the generated commit messages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    /// Plain imperative one-line summaries
    #[default]
    General,
    /// Conventional Commits (`type(scope): subject`)
    Conventional,
    /// Gitmoji-prefixed summaries
    Gitmoji,
}

impl CommitStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Conventional => "conventional",
            Self::Gitmoji => "gitmoji",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::General => {
                "Write a concise imperative summary of the change, e.g. \"Add retry to upload client\"."
            }
            Self::Conventional => {
                "Use the Conventional Commits format `<type>(<optional scope>): <description>` with \
                 type one of feat, fix, refactor, docs, test, chore, style, perf, build, ci, revert."
            }
            Self::Gitmoji => {
                "Start each message with the gitmoji matching the change (e.g. ✨ feature, 🐛 fix, \
                 ♻️ refactor, 📝 docs), followed by a concise imperative summary."
            }
        }
    }
}

impl fmt::Display for CommitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the generation service is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub locale: String,
    pub style: CommitStyle,
    pub count: usize,
    pub model: String,
}

/// One generated message offered for acceptance; `rank` is generation order
/// starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCandidate {
    pub rank: usize,
    pub text: String,
}
