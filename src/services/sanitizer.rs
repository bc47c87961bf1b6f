// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::MessageCandidate;

/// Longest subject line kept before truncation.
pub const MAX_SUBJECT_CHARS: usize = 72;

static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{1,2}[.):]|[-*•])\s+").unwrap());

static PREAMBLE_PATTERNS: &[&str] = &[
    "here's the commit message",
    "here is the commit message",
    "here are the commit messages",
    "here are some commit messages",
    "here are",
    "commit messages:",
    "commit message:",
    "suggested commit:",
    "suggested commits:",
];

/// Turns untrusted service output into ranked candidates.
pub struct CandidateParser;

impl CandidateParser {
    /// Parse one message per line, best first.
    ///
    /// Code fences, list numbering, wrapping quotes and chatty preambles are
    /// stripped; duplicates are dropped keeping the first occurrence; at most
    /// `count` candidates are returned. An empty vec means the response had
    /// nothing usable.
    pub fn parse(raw: &str, count: usize) -> Vec<MessageCandidate> {
        let mut seen: Vec<String> = Vec::new();

        for line in raw.lines() {
            if seen.len() == count {
                break;
            }
            let Some(message) = Self::clean_line(line) else {
                continue;
            };
            if !seen.contains(&message) {
                seen.push(message);
            }
        }

        seen.into_iter()
            .enumerate()
            .map(|(i, text)| MessageCandidate { rank: i + 1, text })
            .collect()
    }

    fn clean_line(line: &str) -> Option<String> {
        let mut cleaned = line.trim();

        if cleaned.is_empty() || cleaned.starts_with("```") {
            return None;
        }

        cleaned = LIST_MARKER_REGEX
            .find(cleaned)
            .map_or(cleaned, |m| &cleaned[m.end()..]);

        // A preamble may carry the message after its colon
        let lower = cleaned.to_lowercase();
        for pattern in PREAMBLE_PATTERNS {
            if lower.starts_with(pattern) {
                if let Some(rest) = cleaned.get(pattern.len()..) {
                    cleaned = rest.trim_start_matches(':').trim();
                }
                break;
            }
        }

        cleaned = strip_wrapping(cleaned.trim());
        if cleaned.is_empty() || cleaned.ends_with(':') {
            return None;
        }

        Some(truncate_subject(cleaned))
    }
}

fn strip_wrapping(s: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s[1..s.len() - 1].trim();
        }
    }
    s
}

/// Cut to [`MAX_SUBJECT_CHARS`] on a char boundary, ending in "...".
pub fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() <= MAX_SUBJECT_CHARS {
        return subject.to_string();
    }
    let kept: String = subject.chars().take(MAX_SUBJECT_CHARS - 3).collect();
    format!("{kept}...")
}
