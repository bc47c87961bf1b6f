// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{CommitMode, Strategy};

pub struct StrategyResolver;

impl StrategyResolver {
    /// Decide the commit strategy.
    ///
    /// An explicit `--directory` flag wins over the configured mode, whatever
    /// layer that mode came from. `auto` only asks when there is something to
    /// choose between.
    pub fn resolve(cli_flag: Option<bool>, mode: CommitMode, partition_count: usize) -> Strategy {
        match (cli_flag, mode) {
            (Some(true), _) => Strategy::PerDirectory,
            (Some(false), _) => Strategy::Global,
            (None, CommitMode::Directory) => Strategy::PerDirectory,
            (None, CommitMode::Global) => Strategy::Global,
            (None, CommitMode::Auto) if partition_count <= 1 => Strategy::Global,
            (None, CommitMode::Auto) => Strategy::InteractivePrompt,
        }
    }
}
