// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use devcommit::domain::ChangeKind;
use devcommit::services::git::GitService;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(output) = std::str::from_utf8(data) else {
        return;
    };

    for (kind, _path, old_path) in GitService::parse_name_status(output) {
        if old_path.is_some() {
            assert_eq!(kind, ChangeKind::Renamed);
        }
    }
});
