// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{ChangeKind, FileChange, GenerationOptions};

pub struct PromptBuilder;

impl PromptBuilder {
    /// Instructions sent as the system message.
    pub fn system(options: &GenerationOptions) -> String {
        let count_rule = if options.count == 1 {
            "Output exactly one commit message.".to_string()
        } else {
            format!(
                "Output exactly {} different commit messages, one per line, best first.",
                options.count
            )
        };

        format!(
            "You write git commit messages from unified diffs.\n\
             \n\
             RULES:\n\
             1. Describe the ACTUAL change in the diff, be specific\n\
             2. {style}\n\
             3. Write the messages in the language of locale {locale}\n\
             4. {count_rule}\n\
             5. Each message is a single line of at most 72 characters\n\
             6. Output ONLY the messages: no numbering, no quotes, no explanations",
            style = options.style.instructions(),
            locale = options.locale,
        )
    }

    /// User message: a change summary followed by the (shaped) diff.
    pub fn user(files: &[FileChange], diff: &str) -> String {
        let mut prompt = String::new();
        prompt.push_str(&Self::summary(files));
        prompt.push_str("\n\nFILES:\n");
        for file in files {
            prompt.push_str(&format!(
                "{} {} (+{} -{})\n",
                file.kind.marker(),
                file.path.display(),
                file.additions,
                file.deletions
            ));
        }
        prompt.push_str("\nDIFF:\n");
        prompt.push_str(diff);
        prompt
    }

    fn summary(files: &[FileChange]) -> String {
        let count = |kind: ChangeKind| files.iter().filter(|f| f.kind == kind).count();
        let insertions: usize = files.iter().map(|f| f.additions).sum();
        let deletions: usize = files.iter().map(|f| f.deletions).sum();

        format!(
            "SUMMARY: {} files ({} added, {} modified, {} deleted, {} renamed) | +{} -{}",
            files.len(),
            count(ChangeKind::Added),
            count(ChangeKind::Modified),
            count(ChangeKind::Deleted),
            count(ChangeKind::Renamed),
            insertions,
            deletions
        )
    }
}
