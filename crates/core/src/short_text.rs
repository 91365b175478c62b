//! Very-short-text removal for character-level diffs (spec §4.8).
//!
//! Only the join phase is implemented (see `DESIGN.md` for why the trim phase is out of scope).
//! Prevents aesthetically noisy "islands" — tiny unchanged gaps sitting inside what is really one
//! larger change — by fusing diffs across a gap that's both short and surrounded by substantial
//! changes.

use crate::seqdiff::{debug_assert_sorted_and_disjoint, SequenceDiff};

const MAX_GAP_NON_WHITESPACE: usize = 20;
const MAX_GAP_NEWLINES: usize = 1;
const MAX_GAP_LINES: usize = 5;
const MAX_PASSES: usize = 10;

/// `pow(pow(line_count * 40 + char_count, 1.5), 1.5)`, i.e. `(lineCount*40 + charCount)^2.25`.
fn largeness(line_count: usize, char_count: usize) -> f64 {
    let base = (line_count * 40 + char_count) as f64;
    base.powf(1.5).powf(1.5)
}

/// `130^1.5 ^1.5 * 1.3`, the minimum combined largeness for a join to be allowed.
fn threshold() -> f64 {
    130.0f64.powf(1.5).powf(1.5) * 1.3
}

fn diff_largeness(d: &SequenceDiff, units: &[u16]) -> f64 {
    let slice = &units[d.seq1_start.min(units.len())..d.seq1_end.min(units.len())];
    let char_count = slice.len();
    let line_count = slice.iter().filter(|&&u| u == b'\n' as u16).count() + 1;
    largeness(line_count, char_count)
}

/// Fuse consecutive diffs separated by a small, mostly-whitespace gap when their combined
/// largeness clears the threshold. `units` is sequence 1's character stream (the gap is measured
/// against the original side, as in the line-level remover).
pub fn remove_very_short_text(units: &[u16], diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut diffs = diffs;
    let min_combined = threshold();
    for _ in 0..MAX_PASSES {
        let mut changed = false;
        let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
        for d in diffs {
            if let Some(last) = out.last_mut() {
                let gap = &units[last.seq1_end.min(units.len())..d.seq1_start.min(units.len())];
                let non_ws = gap.iter().filter(|&&u| !is_ws(u)).count();
                let newlines = gap.iter().filter(|&&u| u == b'\n' as u16).count();
                let gap_lines = newlines + 1;

                if non_ws <= MAX_GAP_NON_WHITESPACE && newlines <= MAX_GAP_NEWLINES && gap_lines <= MAX_GAP_LINES {
                    let combined = diff_largeness(last, units) + diff_largeness(&d, units);
                    if combined > min_combined {
                        last.seq1_end = d.seq1_end;
                        last.seq2_end = d.seq2_end;
                        changed = true;
                        continue;
                    }
                }
            }
            out.push(d);
        }
        diffs = out;
        if !changed {
            break;
        }
    }
    debug_assert_sorted_and_disjoint(&diffs);
    diffs
}

fn is_ws(unit: u16) -> bool {
    matches!(unit, 0x20 | 0x09 | 0x0A | 0x0D)
}
