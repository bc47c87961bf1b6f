// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use devcommit::services::sanitizer::{CandidateParser, MAX_SUBJECT_CHARS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let count = data.first().map_or(1, |b| usize::from(b % 10) + 1);

    let candidates = CandidateParser::parse(raw, count);
    assert!(candidates.len() <= count);
    for candidate in &candidates {
        assert!(candidate.text.chars().count() <= MAX_SUBJECT_CHARS);
        assert!(!candidate.text.contains('\n'));
    }
});
