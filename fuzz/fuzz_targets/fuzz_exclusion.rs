// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use std::path::Path;

use devcommit::services::exclusion::ExclusionFilter;
use libfuzzer_sys::fuzz_target;

// First line: comma-separated patterns. Remaining lines: paths.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut lines = input.lines();
    let patterns: Vec<&str> = lines.next().unwrap_or("").split(',').collect();

    let Ok(filter) = ExclusionFilter::new(&patterns) else {
        return;
    };
    for path in lines {
        let _ = filter.is_excluded(Path::new(path));
    }
});
