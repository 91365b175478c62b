//! Word/subword diff extension (spec §4.7).
//!
//! Grows each character-level diff that lands mid-word so it swallows the whole word (or, in
//! the subword pass, the whole CamelCase segment) whenever the diff already covers more than a
//! third of it. Operates directly on [`CharSequenceSlice`] since it needs raw UTF-16 units, not
//! just the [`crate::sequence::Sequence`] contract.

use crate::sequence::{is_word_char, CharSequenceSlice};
use crate::seqdiff::SequenceDiff;

/// Fraction of a word that must already be equal for the extension to be skipped, expressed as
/// `equal_chars < word_len * threshold`. `force=true` (subword pass) uses 1.0, i.e. always swallow.
fn threshold(force: bool) -> f64 {
    if force {
        1.0
    } else {
        2.0 / 3.0
    }
}

fn is_lower(unit: u16) -> bool {
    unit <= 127 && (unit as u8 as char).is_ascii_lowercase()
}

fn is_upper(unit: u16) -> bool {
    unit <= 127 && (unit as u8 as char).is_ascii_uppercase()
}

/// The maximal run of word characters touching offset `o` (i.e. `units[o]` or `units[o-1]` is a
/// word char); empty `(o, o)` if neither neighbour is a word character.
fn word_run(units: &[u16], o: usize) -> (usize, usize) {
    let touches_right = o < units.len() && is_word_char(units[o]);
    let touches_left = o > 0 && is_word_char(units[o - 1]);
    if !touches_right && !touches_left {
        return (o, o);
    }
    let mut start = o;
    while start > 0 && is_word_char(units[start - 1]) {
        start -= 1;
    }
    let mut end = o;
    while end < units.len() && is_word_char(units[end]) {
        end += 1;
    }
    (start, end)
}

/// Split `[start, end)` on lower->upper CamelCase boundaries and return the sub-span containing
/// `o` (the segment whose range is `[left_boundary, right_boundary)`).
fn subword_span(units: &[u16], start: usize, end: usize, o: usize) -> (usize, usize) {
    let mut boundaries = vec![start];
    for k in (start + 1)..end {
        if is_lower(units[k - 1]) && is_upper(units[k]) {
            boundaries.push(k);
        }
    }
    boundaries.push(end);

    let o_clamped = o.clamp(start, end);
    let mut left = start;
    let mut right = end;
    for w in boundaries.windows(2) {
        if w[0] <= o_clamped && o_clamped <= w[1] {
            left = w[0];
            right = w[1];
            break;
        }
    }
    (left, right)
}

/// The word (or subword, if `subword`) span touching offset `o`.
fn word_span(units: &[u16], o: usize, subword: bool) -> (usize, usize) {
    let (start, end) = word_run(units, o);
    if start == end {
        return (start, end);
    }
    if subword {
        subword_span(units, start, end, o)
    } else {
        (start, end)
    }
}

/// Extend each diff bordering a partially-covered word to cover it fully. `force=true` is the
/// subword pass (always swallow); `force=false` is the word pass (swallow only if less than 2/3
/// of the word survives unchanged).
pub fn extend_to_words(
    seq1: &CharSequenceSlice,
    seq2: &CharSequenceSlice,
    diffs: Vec<SequenceDiff>,
    force: bool,
    subword: bool,
) -> Vec<SequenceDiff> {
    if diffs.is_empty() {
        return diffs;
    }
    let units1 = seq1.units();
    let units2 = seq2.units();
    let threshold = threshold(force);
    let mut out = diffs;

    // Right end of diff i's equal region (i.e. diff i's own right boundary, extended leftward
    // into diff i, and diff i+1's left boundary extended rightward) is shared between the two
    // neighbouring diffs, so process boundaries between consecutive diffs together.
    for i in 0..out.len() {
        // Right boundary of diff i (only meaningful if diff i is non-empty on that side).
        extend_boundary(&mut out, i, true, units1, units2, threshold, subword);
        extend_boundary(&mut out, i, false, units1, units2, threshold, subword);
    }

    merge_overlapping(out)
}

/// Extend diff `i`'s start (`is_start=true`) or end (`is_start=false`) boundary to swallow a
/// partially-covered word on either side.
fn extend_boundary(
    diffs: &mut [SequenceDiff],
    i: usize,
    is_start: bool,
    units1: &[u16],
    units2: &[u16],
    threshold: f64,
    subword: bool,
) {
    let d = diffs[i];
    let (o1, o2, bound1, bound2) = if is_start {
        (d.seq1_start, d.seq2_start, prev_bound1(diffs, i), prev_bound2(diffs, i))
    } else {
        (d.seq1_end, d.seq2_end, next_bound1(diffs, i), next_bound2(diffs, i))
    };

    let mut new1 = o1;
    let (ws, we) = word_span(units1, o1, subword);
    if ws < we {
        let covered = if is_start { o1 - ws } else { we - o1 };
        if (covered as f64) < (we - ws) as f64 * threshold {
            new1 = if is_start { ws.max(bound1) } else { we.min(bound1) };
        }
    }

    let mut new2 = o2;
    let (ws2, we2) = word_span(units2, o2, subword);
    if ws2 < we2 {
        let covered2 = if is_start { o2 - ws2 } else { we2 - o2 };
        if (covered2 as f64) < (we2 - ws2) as f64 * threshold {
            new2 = if is_start { ws2.max(bound2) } else { we2.min(bound2) };
        }
    }

    if is_start {
        diffs[i].seq1_start = new1;
        diffs[i].seq2_start = new2;
    } else {
        diffs[i].seq1_end = new1;
        diffs[i].seq2_end = new2;
    }
}

fn prev_bound1(diffs: &[SequenceDiff], i: usize) -> usize {
    if i == 0 {
        0
    } else {
        diffs[i - 1].seq1_end
    }
}
fn prev_bound2(diffs: &[SequenceDiff], i: usize) -> usize {
    if i == 0 {
        0
    } else {
        diffs[i - 1].seq2_end
    }
}
fn next_bound1(diffs: &[SequenceDiff], i: usize) -> usize {
    diffs.get(i + 1).map(|d| d.seq1_start).unwrap_or(usize::MAX)
}
fn next_bound2(diffs: &[SequenceDiff], i: usize) -> usize {
    diffs.get(i + 1).map(|d| d.seq2_start).unwrap_or(usize::MAX)
}

/// Merge diffs whose ranges now overlap or touch after extension, restoring sorted-disjoint form.
fn merge_overlapping(mut diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    diffs.sort_by_key(|d| (d.seq1_start, d.seq2_start));
    let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for d in diffs {
        if let Some(last) = out.last_mut() {
            if d.seq1_start <= last.seq1_end || d.seq2_start <= last.seq2_end {
                last.seq1_end = last.seq1_end.max(d.seq1_end);
                last.seq2_end = last.seq2_end.max(d.seq2_end);
                last.seq1_start = last.seq1_start.min(d.seq1_start);
                last.seq2_start = last.seq2_start.min(d.seq2_start);
                continue;
            }
        }
        out.push(d);
    }
    out
}
