// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod change;
mod commit;
mod partition;
mod report;
mod strategy;

pub use change::*;
pub use commit::*;
pub use partition::*;
pub use report::*;
pub use strategy::*;
