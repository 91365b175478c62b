//! Textual dump format (spec §6): a deterministic, human-diffable rendering of a [`LinesDiff`],
//! used as this crate's self-check correctness gate in `tests/scenarios.rs`.

use crate::types::{LinesDiff, RangeMapping};
use std::fmt::Write as _;

/// Format a `LinesDiff` as one line per change:
/// `Lines S-E -> Lines S-E (N inner change[s])`, followed by one
/// `     Inner: Lsl:Csc-Lel:Cec -> Lsl:Csc-Lel:Cec` line per inner change.
pub fn format_lines_diff(diff: &LinesDiff) -> String {
    let mut out = String::new();
    for change in &diff.changes {
        let count = change.inner_changes.len();
        let plural = if count == 1 { "" } else { "s" };
        writeln!(
            out,
            "Lines {}-{} -> Lines {}-{} ({count} inner change{plural})",
            change.original.start,
            change.original.end_exclusive,
            change.modified.start,
            change.modified.end_exclusive,
        )
        .unwrap();
        for inner in &change.inner_changes {
            writeln!(out, "     Inner: {}", format_inner(inner)).unwrap();
        }
    }
    out
}

fn format_inner(m: &RangeMapping) -> String {
    format!(
        "{}:{}-{}:{} -> {}:{}-{}:{}",
        m.original.start.line,
        m.original.start.column,
        m.original.end.line,
        m.original.end.column,
        m.modified.start.line,
        m.modified.start.column,
        m.modified.end.line,
        m.modified.end.column,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharRange, DetailedLineRangeMapping, LineRange, Position};

    #[test]
    fn empty_diff_formats_as_empty_string() {
        let diff = LinesDiff { changes: vec![], moves: vec![], hit_timeout: false };
        assert_eq!(format_lines_diff(&diff), "");
    }

    #[test]
    fn single_change_with_one_inner_change_formats_as_two_lines() {
        let inner = RangeMapping {
            original: CharRange::new(Position::new(1, 7), Position::new(1, 12)),
            modified: CharRange::new(Position::new(1, 7), Position::new(1, 12)),
        };
        let diff = LinesDiff {
            changes: vec![DetailedLineRangeMapping {
                original: LineRange::new(1, 2),
                modified: LineRange::new(1, 2),
                inner_changes: vec![inner],
            }],
            moves: vec![],
            hit_timeout: false,
        };
        let expected = "Lines 1-2 -> Lines 1-2 (1 inner change)\n     Inner: 1:7-1:12 -> 1:7-1:12\n";
        assert_eq!(format_lines_diff(&diff), expected);
    }

    #[test]
    fn zero_inner_changes_uses_plural_form() {
        let diff = LinesDiff {
            changes: vec![DetailedLineRangeMapping {
                original: LineRange::empty_at(2),
                modified: LineRange::new(2, 3),
                inner_changes: vec![],
            }],
            moves: vec![],
            hit_timeout: false,
        };
        assert_eq!(format_lines_diff(&diff), "Lines 2-2 -> Lines 2-3 (0 inner changes)\n");
    }
}
