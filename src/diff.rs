//! Diff generation for previewing rewrites.

use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = format!("--- a/{}\n+++ b/{}\n", path.display(), path.display());

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };

                output.push(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Colorized diff output for terminal display.
pub fn colorized_diff(original: &str, modified: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(original, modified);

    const RED: &str = "\x1b[31m";
    const GREEN: &str = "\x1b[32m";
    const CYAN: &str = "\x1b[36m";
    const RESET: &str = "\x1b[0m";

    let mut output = format!(
        "{CYAN}--- a/{path}{RESET}\n{CYAN}+++ b/{path}{RESET}\n",
        path = path.display()
    );

    for group in diff.grouped_ops(3).iter() {
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("-", RED),
                    ChangeTag::Insert => ("+", GREEN),
                    ChangeTag::Equal => (" ", ""),
                };

                let line = change.value().trim_end_matches('\n');
                if color.is_empty() {
                    output.push_str(&format!("{}{}\n", sign, line));
                } else {
                    output.push_str(&format!("{}{}{}{}\n", color, sign, line, RESET));
                }
            }
        }
    }

    output
}

/// Line-level totals across all rewritten files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Creates a summary from original and modified content.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let mut insertions = 0;
        let mut deletions = 0;

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => insertions += 1,
                ChangeTag::Delete => deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        Self {
            files_changed: if insertions > 0 || deletions > 0 { 1 } else { 0 },
            insertions,
            deletions,
        }
    }

    /// Combines two summaries.
    pub fn merge(&mut self, other: &DiffSummary) {
        self.files_changed += other.files_changed;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file(s) changed, {} insertions(+), {} deletions(-)",
            self.files_changed, self.insertions, self.deletions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_marks_changed_line() {
        let diff = unified_diff(
            "const a = user._id;\nconst b = 1;\n",
            "const a = user.id;\nconst b = 1;\n",
            Path::new("src/a.ts"),
        );

        assert!(diff.starts_with("--- a/src/a.ts\n+++ b/src/a.ts\n"));
        assert!(diff.contains("-const a = user._id;\n"));
        assert!(diff.contains("+const a = user.id;\n"));
        assert!(diff.contains(" const b = 1;\n"));
    }

    #[test]
    fn test_unified_diff_without_trailing_newline() {
        let diff = unified_diff("x._id", "x.id", Path::new("a.ts"));
        assert!(diff.contains("-x._id\n+x.id\n"));
    }

    #[test]
    fn test_unified_diff_separates_hunks() {
        let original: String = (0..10).map(|i| format!("l{i}\n")).collect();
        let modified = original.replace("l0\n", "L0\n").replace("l9\n", "L9\n");

        assert_eq!(
            unified_diff(&original, &modified, Path::new("a.ts")),
            concat!(
                "--- a/a.ts\n+++ b/a.ts\n",
                "-l0\n+L0\n l1\n l2\n l3\n",
                "\n",
                " l6\n l7\n l8\n-l9\n+L9\n",
            )
        );
    }

    #[test]
    fn test_summary_counts_lines() {
        let summary = DiffSummary::from_diff("a\nb\nc\n", "a\nB\nc\nd\n");
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.insertions, 2);
        assert_eq!(summary.deletions, 1);

        let unchanged = DiffSummary::from_diff("a\n", "a\n");
        assert_eq!(unchanged, DiffSummary::default());
    }

    #[test]
    fn test_summary_merge_and_display() {
        let mut total = DiffSummary::from_diff("a\n", "b\n");
        total.merge(&DiffSummary::from_diff("c\n", "d\ne\n"));
        assert_eq!(
            total.to_string(),
            "2 file(s) changed, 3 insertions(+), 2 deletions(-)"
        );
    }

    #[test]
    fn test_colorized_diff_has_colors() {
        let diff = colorized_diff("a\n", "b\n", Path::new("x.tsx"));
        assert!(diff.contains("\x1b[31m-a\x1b[0m"));
        assert!(diff.contains("\x1b[32m+b\x1b[0m"));
        assert!(diff.starts_with("\x1b[36m--- a/x.tsx\x1b[0m\n\x1b[36m+++ b/x.tsx\x1b[0m\n"));
    }
}
