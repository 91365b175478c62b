//! Shape-quality heuristic passes applied after the raw algorithm (spec §4.6).
//!
//! Every pass operates on `(seq1, seq2, diffs)` and returns a new sorted, disjoint diff list;
//! `optimize_sequence_diffs` is the fixed composition shared by the line and character pipelines.

use crate::seqdiff::{debug_assert_sorted_and_disjoint, SequenceDiff};
use crate::sequence::Sequence;

/// join ×2, shift-to-better-boundary (which internally removes short matches), remove-short-matches.
pub fn optimize_sequence_diffs<S: Sequence>(seq1: &S, seq2: &S, diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    log::trace!("optimize_sequence_diffs: entering with {} diffs", diffs.len());
    let diffs = join_sequence_diffs_by_shifting(seq1, seq2, diffs);
    let diffs = join_sequence_diffs_by_shifting(seq1, seq2, diffs);
    let diffs = shift_sequence_diff_boundaries(seq1, seq2, diffs);
    let diffs = remove_short_matches(diffs);
    log::trace!("optimize_sequence_diffs: exiting with {} diffs", diffs.len());
    diffs
}

/// Try to shift each pure-insertion/pure-deletion diff by its own length so that it fuses with
/// its neighbour, merging on success.
pub fn join_sequence_diffs_by_shifting<S: Sequence>(seq1: &S, seq2: &S, diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    log::trace!("join_sequence_diffs_by_shifting: entering with {} diffs", diffs.len());
    let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for d in diffs {
        let Some(shifted) = try_shift(seq1, seq2, &d) else {
            push_merging(&mut out, d);
            continue;
        };
        push_merging(&mut out, shifted);
    }
    debug_assert_sorted_and_disjoint(&out);
    log::trace!("join_sequence_diffs_by_shifting: exiting with {} diffs", out.len());
    out
}

/// Push `d` onto `out`, fusing with the last element if they now touch.
fn push_merging(out: &mut Vec<SequenceDiff>, d: SequenceDiff) {
    if let Some(last) = out.last_mut() {
        if last.seq1_end == d.seq1_start && last.seq2_end == d.seq2_start {
            last.seq1_end = d.seq1_end;
            last.seq2_end = d.seq2_end;
            return;
        }
    }
    out.push(d);
}

/// Attempt to shift a pure insertion/deletion left (using `element_at` equality) or right (using
/// `strong_equal`) by its own length; returns the shifted diff on success.
fn try_shift<S: Sequence>(seq1: &S, seq2: &S, d: &SequenceDiff) -> Option<SequenceDiff> {
    if !(d.is_pure_insertion() || d.is_pure_deletion()) {
        return None;
    }
    let len = if d.is_pure_insertion() { d.seq2_len() } else { d.seq1_len() };
    if len == 0 {
        return None;
    }

    // Shift left: candidate positions slide back by `len`.
    if can_shift_left(seq1, seq2, d, len) {
        return Some(SequenceDiff::new(
            d.seq1_start - len_on_seq1(d, len),
            d.seq1_end - len_on_seq1(d, len),
            d.seq2_start - len_on_seq2(d, len),
            d.seq2_end - len_on_seq2(d, len),
        ));
    }
    if can_shift_right(seq1, seq2, d, len) {
        return Some(SequenceDiff::new(
            d.seq1_start + len_on_seq1(d, len),
            d.seq1_end + len_on_seq1(d, len),
            d.seq2_start + len_on_seq2(d, len),
            d.seq2_end + len_on_seq2(d, len),
        ));
    }
    None
}

fn len_on_seq1(d: &SequenceDiff, len: usize) -> usize {
    if d.is_pure_insertion() {
        0
    } else {
        len
    }
}

fn len_on_seq2(d: &SequenceDiff, len: usize) -> usize {
    if d.is_pure_insertion() {
        len
    } else {
        0
    }
}

fn can_shift_left<S: Sequence>(seq1: &S, seq2: &S, d: &SequenceDiff, len: usize) -> bool {
    let start = if d.is_pure_insertion() { d.seq2_start } else { d.seq1_start };
    if start < len {
        return false;
    }
    for k in 1..=len {
        let before = if d.is_pure_insertion() { seq2.element_at(d.seq2_start - k) } else { seq1.element_at(d.seq1_start - k) };
        let inside = if d.is_pure_insertion() { seq2.element_at(d.seq2_end - k) } else { seq1.element_at(d.seq1_end - k) };
        if before != inside {
            return false;
        }
    }
    true
}

fn can_shift_right<S: Sequence>(seq1: &S, seq2: &S, d: &SequenceDiff, len: usize) -> bool {
    let (end, seq_len) = if d.is_pure_insertion() { (d.seq2_end, seq2.length()) } else { (d.seq1_end, seq1.length()) };
    if end + len > seq_len {
        return false;
    }
    for k in 0..len {
        let after = if d.is_pure_insertion() { d.seq2_end + k } else { d.seq1_end + k };
        let inside = if d.is_pure_insertion() { d.seq2_start + k } else { d.seq1_start + k };
        let equal = if d.is_pure_insertion() { seq2.strong_equal(after, inside) } else { seq1.strong_equal(after, inside) };
        if !equal {
            return false;
        }
    }
    true
}

const SHIFT_WINDOW: isize = 100;

/// For each pure insertion/deletion diff, explore shifting within `[-100, +100]` and pick the
/// offset with the best boundary score (ties: smaller absolute offset, then earlier position).
pub fn shift_sequence_diff_boundaries<S: Sequence>(seq1: &S, seq2: &S, diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    log::trace!("shift_sequence_diff_boundaries: entering with {} diffs", diffs.len());
    let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for (i, d) in diffs.iter().enumerate() {
        if !(d.is_pure_insertion() || d.is_pure_deletion()) {
            out.push(*d);
            continue;
        }
        let own_pos = |dd: &SequenceDiff, start: bool| if d.is_pure_insertion() {
            if start { dd.seq2_start } else { dd.seq2_end }
        } else if start {
            dd.seq1_start
        } else {
            dd.seq1_end
        };
        let own_len = if d.is_pure_insertion() { seq2.length() } else { seq1.length() };
        let prev_bound = if i == 0 { 0 } else { own_pos(&diffs[i - 1], false) };
        let next_bound = diffs.get(i + 1).map(|n| own_pos(n, true)).unwrap_or(own_len);

        let best = best_boundary_offset(seq1, seq2, d, prev_bound, next_bound);
        out.push(apply_offset(d, best));
    }
    let out = remove_short_matches(out);
    debug_assert_sorted_and_disjoint(&out);
    log::trace!("shift_sequence_diff_boundaries: exiting with {} diffs", out.len());
    out
}

fn apply_offset(d: &SequenceDiff, offset: isize) -> SequenceDiff {
    if offset == 0 {
        return *d;
    }
    let shift1 = if d.is_pure_insertion() { 0 } else { offset };
    let shift2 = if d.is_pure_insertion() { offset } else { 0 };
    SequenceDiff::new(
        (d.seq1_start as isize + shift1) as usize,
        (d.seq1_end as isize + shift1) as usize,
        (d.seq2_start as isize + shift2) as usize,
        (d.seq2_end as isize + shift2) as usize,
    )
}

fn best_boundary_offset<S: Sequence>(seq1: &S, seq2: &S, d: &SequenceDiff, prev_bound: usize, next_bound: usize) -> isize {
    let (own_start, own_end) =
        if d.is_pure_insertion() { (d.seq2_start, d.seq2_end) } else { (d.seq1_start, d.seq1_end) };
    let lo = -((own_start - prev_bound.min(own_start)) as isize).min(SHIFT_WINDOW);
    let hi = ((next_bound.max(own_end) - own_end) as isize).min(SHIFT_WINDOW);

    let mut best_offset = 0isize;
    let mut best_score = score_at_offset(seq1, seq2, d, 0);
    for offset in lo..=hi {
        if offset == 0 {
            continue;
        }
        let score = score_at_offset(seq1, seq2, d, offset);
        let better = score > best_score
            || (score == best_score && offset.abs() < best_offset.abs())
            || (score == best_score && offset.abs() == best_offset.abs() && offset < best_offset);
        if better {
            best_score = score;
            best_offset = offset;
        }
    }
    best_offset
}

fn score_at_offset<S: Sequence>(seq1: &S, seq2: &S, d: &SequenceDiff, offset: isize) -> i64 {
    let shift1 = if d.is_pure_insertion() { 0 } else { offset };
    let shift2 = if d.is_pure_insertion() { offset } else { 0 };
    let seq1_pos = (d.seq1_start as isize + shift1) as usize;
    let seq2_start_pos = (d.seq2_start as isize + shift2) as usize;
    let seq2_end_pos = (d.seq2_end as isize + shift2) as usize;
    seq1.boundary_score(seq1_pos) + seq2.boundary_score(seq2_start_pos) + seq2.boundary_score(seq2_end_pos)
}

/// Fuse consecutive diffs whose gap is `<= 2` elements on either sequence.
pub fn remove_short_matches(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    const MAX_GAP: usize = 2;
    log::trace!("remove_short_matches: entering with {} diffs", diffs.len());
    let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for d in diffs {
        if let Some(last) = out.last_mut() {
            let gap1 = d.seq1_start - last.seq1_end;
            let gap2 = d.seq2_start - last.seq2_end;
            let last: &mut SequenceDiff = last;
            if gap1 <= MAX_GAP || gap2 <= MAX_GAP {
                last.seq1_end = d.seq1_end;
                last.seq2_end = d.seq2_end;
                continue;
            }
        }
        out.push(d);
    }
    debug_assert_sorted_and_disjoint(&out);
    log::trace!("remove_short_matches: exiting with {} diffs", out.len());
    out
}

/// Line-sequences-only pass: join diffs whose gap lines contain at most 4 non-whitespace
/// characters, provided at least one of the pair is "substantial" (`seq1_len + seq2_len > 5`).
/// Iterates up to 10 passes, stopping early once a pass makes no change.
pub fn remove_very_short_matching_lines_between_diffs(lines1: &[String], diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut diffs = diffs;
    for _ in 0..10 {
        let mut changed = false;
        let mut out: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
        for d in diffs {
            if let Some(last) = out.last_mut() {
                let gap_non_ws: usize =
                    lines1[last.seq1_end..d.seq1_start].iter().map(|l| l.chars().filter(|c| !c.is_whitespace()).count()).sum();
                let substantial = (last.seq1_len() + last.seq2_len() > 5) || (d.seq1_len() + d.seq2_len() > 5);
                if gap_non_ws <= 4 && substantial {
                    last.seq1_end = d.seq1_end;
                    last.seq2_end = d.seq2_end;
                    changed = true;
                    continue;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::LineSequence;

    struct VecSeq(Vec<u32>);
    impl Sequence for VecSeq {
        fn length(&self) -> usize {
            self.0.len()
        }
        fn element_at(&self, i: usize) -> u32 {
            self.0[i]
        }
        fn strong_equal(&self, i: usize, j: usize) -> bool {
            self.0[i] == self.0[j]
        }
        fn boundary_score(&self, pos: usize) -> i64 {
            // Favor boundaries at even positions, to make shift-to-better-boundary deterministic.
            if pos % 2 == 0 {
                10
            } else {
                0
            }
        }
    }

    #[test]
    fn remove_short_matches_fuses_close_diffs() {
        let diffs = vec![SequenceDiff::new(0, 1, 0, 1), SequenceDiff::new(2, 3, 2, 3)];
        let out = remove_short_matches(diffs);
        assert_eq!(out, vec![SequenceDiff::new(0, 3, 0, 3)]);
    }

    #[test]
    fn remove_short_matches_leaves_distant_diffs_alone() {
        let diffs = vec![SequenceDiff::new(0, 1, 0, 1), SequenceDiff::new(10, 11, 10, 11)];
        let out = remove_short_matches(diffs);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn join_by_shifting_fuses_a_shiftable_insertion() {
        // seq1: a b c b c   seq2: a b X b c b c  -- insertion of "X b c" after "a b" can shift
        // left only if the preceding elements repeat; use a simple repeating pattern instead.
        let seq1 = VecSeq(vec![1, 2, 1, 2, 3]);
        let seq2 = VecSeq(vec![1, 2, 1, 2, 1, 2, 3]);
        // Insertion of [1,2] at seq2 positions [2,4): preceding seq2 elements [1,2] (pos 0..2)
        // equal the inserted content, so it should be shiftable left to touch position 0.
        let diffs = vec![SequenceDiff::new(2, 2, 2, 4)];
        let out = join_sequence_diffs_by_shifting(&seq1, &seq2, diffs);
        assert!(out.iter().any(|d| d.seq2_start == 0));
    }

    #[test]
    fn very_short_matching_lines_join_small_gaps() {
        let lines = vec!["a".to_string(), "".to_string(), "b".to_string()];
        let diffs = vec![SequenceDiff::new(0, 1, 0, 1), SequenceDiff::new(2, 10, 2, 10)];
        let out = remove_very_short_matching_lines_between_diffs(&lines, diffs);
        // second diff has seq1_len+seq2_len = 16 > 5 and the gap line is empty (0 non-ws chars)
        assert_eq!(out, vec![SequenceDiff::new(0, 10, 0, 10)]);
    }

    #[test]
    fn optimize_sequence_diffs_is_idempotent() {
        let lines1 = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let hashes1 = vec![0, 1, 2, 3];
        let lines2 = vec!["a".to_string(), "X".to_string(), "c".to_string(), "d".to_string()];
        let hashes2 = vec![0, 4, 2, 3];
        let seq1 = LineSequence::new(lines1, hashes1);
        let seq2 = LineSequence::new(lines2, hashes2);
        let diffs = vec![SequenceDiff::new(1, 2, 1, 2)];
        let once = optimize_sequence_diffs(&seq1, &seq2, diffs.clone());
        let twice = optimize_sequence_diffs(&seq1, &seq2, once.clone());
        assert_eq!(once, twice);
    }
}
