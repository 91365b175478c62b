//! Character-level refiner (spec §4.10): turns one line-level [`SequenceDiff`] into a list of
//! character-level [`RangeMapping`]s with real `Position`s.

use crate::deadline::Deadline;
use crate::dp::{default_equality_score, dp_diff};
use crate::heuristics::{optimize_sequence_diffs, remove_short_matches};
use crate::myers::myers_diff;
use crate::seqdiff::SequenceDiff;
use crate::sequence::CharSequenceSlice;
use crate::short_text::remove_very_short_text;
use crate::types::{CharRange, DiffOptions, Position, RangeMapping};
use crate::word_extend::extend_to_words;

/// Below this combined character-element count, DP is used (better alignment on small inputs);
/// at or above it, Myers (linear-space, scales to long lines).
const CHAR_ALGORITHM_THRESHOLD: usize = 500;

/// Refine one line-level diff spanning `lines1[l0a..l1a)` vs `lines2[l0b..l1b)` into
/// character-level mappings. Returns `(mappings, hit_timeout)`.
pub fn refine_line_diff(
    lines1: &[String],
    lines2: &[String],
    line_diff: &SequenceDiff,
    options: &DiffOptions,
    deadline: &Deadline,
) -> (Vec<RangeMapping>, bool) {
    let l0a = line_diff.seq1_start;
    let l1a = line_diff.seq1_end;
    let l0b = line_diff.seq2_start;
    let l1b = line_diff.seq2_end;

    let trim = options.ignore_trim_whitespace;
    let seq1 = CharSequenceSlice::new(lines1, l0a, l1a, trim);
    let seq2 = CharSequenceSlice::new(lines2, l0b, l1b, trim);

    let total = seq1.length() + seq2.length();
    log::trace!(
        "refine_line_diff: lines1[{l0a}..{l1a}) vs lines2[{l0b}..{l1b}), {total} char elements"
    );
    let (mut diffs, hit_timeout) = if total < CHAR_ALGORITHM_THRESHOLD {
        dp_diff(&seq1, &seq2, deadline, default_equality_score)
    } else {
        myers_diff(&seq1, &seq2, deadline)
    };

    diffs = optimize_sequence_diffs(&seq1, &seq2, diffs);
    diffs = extend_to_words(&seq1, &seq2, diffs, false, false);
    if options.extend_to_subwords {
        diffs = extend_to_words(&seq1, &seq2, diffs, true, true);
    }
    diffs = remove_short_matches(diffs);
    diffs = remove_very_short_text(seq1.units(), diffs);

    let mappings = diffs.iter().map(|d| translate_diff(&seq1, &seq2, d, l0a, l0b)).collect();
    (mappings, hit_timeout)
}

fn translate_diff(seq1: &CharSequenceSlice, seq2: &CharSequenceSlice, d: &SequenceDiff, l0a: usize, l0b: usize) -> RangeMapping {
    let original = translate_range(seq1, d.seq1_start, d.seq1_end, l0a);
    let modified = translate_range(seq2, d.seq2_start, d.seq2_end, l0b);
    RangeMapping { original, modified }
}

fn translate_range(seq: &CharSequenceSlice, start_offset: usize, end_offset: usize, l0: usize) -> CharRange {
    let start = translate_position(seq, start_offset, l0, false);
    let end = translate_position(seq, end_offset, l0, true);
    if end < start {
        CharRange::new(end, end)
    } else {
        CharRange::new(start, end)
    }
}

/// Translate a stream offset into a 1-based `Position`. `is_range_end`: when the offset lands
/// exactly at a line's start, an end position suppresses the trimmed-whitespace column offset
/// (the "left" preference); a start position, or an end not at a line start, always includes it
/// (the "right" preference).
fn translate_position(seq: &CharSequenceSlice, offset: usize, l0: usize, is_range_end: bool) -> Position {
    if seq.line_count() == 0 {
        // An empty line range (pure insertion/deletion point): the only valid offset is 0.
        return Position::new(l0 as u32 + 1, 1);
    }
    let (local_line, col_with_trim) = seq.offset_to_local_line_col(offset);
    let info = seq.line_info(local_line);
    let col_in_stream = offset - info.stream_start;
    let col = if is_range_end && col_in_stream == 0 { 0 } else { col_with_trim };
    Position::new((l0 + local_line) as u32 + 1, col as u32 + 1)
}
