//! Range-mapping converter (spec §4.11): turns the merged character-level [`RangeMapping`] list
//! into a list of [`DetailedLineRangeMapping`]s with derived line ranges.

use crate::types::{CharRange, DetailedLineRangeMapping, LineRange, RangeMapping};

/// Convert character-level mappings (sorted by `original.start`) into grouped line-range
/// mappings. Each input mapping first gets its own derived line range; adjacent/overlapping
/// results are then merged, concatenating their `inner_changes`.
pub fn build_detailed_mappings(alignments: Vec<RangeMapping>) -> Vec<DetailedLineRangeMapping> {
    let per_mapping: Vec<DetailedLineRangeMapping> = alignments.into_iter().map(to_detailed).collect();
    merge_adjacent(per_mapping)
}

fn to_detailed(m: RangeMapping) -> DetailedLineRangeMapping {
    let original = char_range_to_line_range(m.original);
    let modified = char_range_to_line_range(m.modified);
    DetailedLineRangeMapping { original, modified, inner_changes: vec![m] }
}

/// Column-1 boundary rule: a range ending exactly at column 1 of a line doesn't touch that
/// line's content at all, so the line range excludes it; a range starting exactly at column 1
/// owns that line from its first character, so the line range includes it without reaching back.
fn char_range_to_line_range(r: CharRange) -> LineRange {
    let start = r.start.line;
    let end_exclusive = if r.end.column == 1 { r.end.line } else { r.end.line + 1 };
    LineRange::new(start, end_exclusive)
}

fn merge_adjacent(mappings: Vec<DetailedLineRangeMapping>) -> Vec<DetailedLineRangeMapping> {
    let mut out: Vec<DetailedLineRangeMapping> = Vec::with_capacity(mappings.len());
    for m in mappings {
        if let Some(last) = out.last_mut() {
            if touches_or_overlaps(last.original, m.original) || touches_or_overlaps(last.modified, m.modified) {
                last.original = union(last.original, m.original);
                last.modified = union(last.modified, m.modified);
                last.inner_changes.extend(m.inner_changes);
                continue;
            }
        }
        out.push(m);
    }
    out
}

fn touches_or_overlaps(a: LineRange, b: LineRange) -> bool {
    a.start <= b.end_exclusive && b.start <= a.end_exclusive
}

fn union(a: LineRange, b: LineRange) -> LineRange {
    LineRange::new(a.start.min(b.start), a.end_exclusive.max(b.end_exclusive))
}
