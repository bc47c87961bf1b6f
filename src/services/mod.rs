// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod exclusion;
pub mod gateway;
pub mod git;
pub mod llm;
pub mod orchestrator;
pub mod partitioner;
pub mod prompt;
pub mod sanitizer;
pub mod selector;
pub mod sequencer;
pub mod strategy;
