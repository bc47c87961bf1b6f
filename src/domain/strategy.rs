// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

/// Commit mode as configured (file, environment or default).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    #[default]
    Auto,
    Directory,
    Global,
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Directory => write!(f, "directory"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Resolved decision of how many commits a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Global,
    PerDirectory,
    InteractivePrompt,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::PerDirectory => write!(f, "per-directory"),
            Self::InteractivePrompt => write!(f, "interactive"),
        }
    }
}
