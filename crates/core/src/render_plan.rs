//! Render-plan builder (spec §4.12): turns the final `changes` list into two row-aligned,
//! side-by-side lists of rows ready for a diff viewer to paint.

use crate::types::{CharHighlight, DetailedLineRangeMapping, LineTag, RenderPlan, RenderRow, RenderSide};
use crate::utf;

/// Build the render plan for a full diff result. `original`/`modified` are the same line arrays
/// passed to [`crate::compute_diff`]; `changes` is its output.
pub fn build_render_plan(original: &[String], modified: &[String], changes: &[DetailedLineRangeMapping]) -> RenderPlan {
    let mut left: Vec<RenderRow> = Vec::new();
    let mut right: Vec<RenderRow> = Vec::new();

    let mut orig_cursor = 1u32;
    let mut mod_cursor = 1u32;

    for change in changes {
        while orig_cursor < change.original.start && mod_cursor < change.modified.start {
            left.push(unchanged_row(orig_cursor));
            right.push(unchanged_row(mod_cursor));
            orig_cursor += 1;
            mod_cursor += 1;
        }

        let mut left_group: Vec<RenderRow> = (change.original.start..change.original.end_exclusive)
            .map(|line| real_row(line, LineTag::Delete))
            .collect();
        let mut right_group: Vec<RenderRow> = (change.modified.start..change.modified.end_exclusive)
            .map(|line| real_row(line, LineTag::Insert))
            .collect();

        for inner in &change.inner_changes {
            for (line, highlight) in split_highlight(inner.original, original) {
                attach_highlight(&mut left_group, change.original.start, line, highlight);
            }
            for (line, highlight) in split_highlight(inner.modified, modified) {
                attach_highlight(&mut right_group, change.modified.start, line, highlight);
            }
        }

        while left_group.len() < right_group.len() {
            left_group.push(RenderRow::Filler);
        }
        while right_group.len() < left_group.len() {
            right_group.push(RenderRow::Filler);
        }

        left.extend(left_group);
        right.extend(right_group);
        orig_cursor = change.original.end_exclusive;
        mod_cursor = change.modified.end_exclusive;
    }

    while (orig_cursor as usize) <= original.len() && (mod_cursor as usize) <= modified.len() {
        left.push(unchanged_row(orig_cursor));
        right.push(unchanged_row(mod_cursor));
        orig_cursor += 1;
        mod_cursor += 1;
    }

    RenderPlan { left: RenderSide { rows: left }, right: RenderSide { rows: right } }
}

fn unchanged_row(line: u32) -> RenderRow {
    real_row(line, LineTag::Unchanged)
}

fn real_row(line: u32, tag: LineTag) -> RenderRow {
    RenderRow::Real { line, tag, highlights: Vec::new() }
}

fn attach_highlight(group: &mut [RenderRow], group_start_line: u32, line: u32, highlight: CharHighlight) {
    let Some(idx) = line.checked_sub(group_start_line) else { return };
    let Some(RenderRow::Real { highlights, .. }) = group.get_mut(idx as usize) else { return };
    highlights.push(highlight);
}

/// Split a (possibly multi-line) character range into one highlight per line it touches.
/// Empty ranges (pure line insertions/deletions with no inner character change) produce nothing.
fn split_highlight(r: crate::types::CharRange, lines: &[String]) -> Vec<(u32, CharHighlight)> {
    if r.is_empty() {
        return Vec::new();
    }
    if r.start.line == r.end.line {
        return vec![(r.start.line, CharHighlight { start_column: r.start.column, end_column: r.end.column })];
    }

    let mut out = Vec::new();
    let first_len = line_utf16_len(lines, r.start.line);
    out.push((r.start.line, CharHighlight { start_column: r.start.column, end_column: first_len + 1 }));
    for line_no in (r.start.line + 1)..r.end.line {
        let len = line_utf16_len(lines, line_no);
        out.push((line_no, CharHighlight { start_column: 1, end_column: len + 1 }));
    }
    out.push((r.end.line, CharHighlight { start_column: 1, end_column: r.end.column }));
    out
}

fn line_utf16_len(lines: &[String], line_no: u32) -> u32 {
    let idx = (line_no - 1) as usize;
    lines.get(idx).map(|l| utf::utf16_len(l, 0, l.len()) as u32).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharRange, LineRange, Position, RangeMapping};

    fn lines(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_changes_yields_all_unchanged_rows() {
        let a = lines(&["x", "y", "z"]);
        let plan = build_render_plan(&a, &a, &[]);
        assert_eq!(plan.left.rows.len(), 3);
        assert_eq!(plan.right.rows.len(), 3);
        for row in &plan.left.rows {
            assert!(matches!(row, RenderRow::Real { tag: LineTag::Unchanged, .. }));
        }
    }

    #[test]
    fn pure_insertion_pads_left_with_filler() {
        let a = lines(&["a", "c"]);
        let b = lines(&["a", "b", "c"]);
        let change = DetailedLineRangeMapping {
            original: LineRange::empty_at(2),
            modified: LineRange::new(2, 3),
            inner_changes: vec![],
        };
        let plan = build_render_plan(&a, &b, &[change]);
        assert_eq!(plan.left.rows.len(), plan.right.rows.len());
        // row at the insertion point: left is Filler, right is a real Insert row.
        let insert_idx = 1; // after unchanged line "a"
        assert_eq!(plan.left.rows[insert_idx], RenderRow::Filler);
        assert!(matches!(&plan.right.rows[insert_idx], RenderRow::Real { tag: LineTag::Insert, line: 2, .. }));
    }

    #[test]
    fn inner_change_attaches_highlight_to_correct_row() {
        let a = lines(&["hello world"]);
        let b = lines(&["hello there"]);
        let inner = RangeMapping {
            original: CharRange::new(Position::new(1, 7), Position::new(1, 12)),
            modified: CharRange::new(Position::new(1, 7), Position::new(1, 12)),
        };
        let change = DetailedLineRangeMapping {
            original: LineRange::new(1, 2),
            modified: LineRange::new(1, 2),
            inner_changes: vec![inner],
        };
        let plan = build_render_plan(&a, &b, &[change]);
        let RenderRow::Real { highlights, .. } = &plan.left.rows[0] else { panic!("expected real row") };
        assert_eq!(highlights, &vec![CharHighlight { start_column: 7, end_column: 12 }]);
    }
}
