//! Line-level orchestrator (spec §4.9): the top of the pipeline, called once per
//! [`crate::compute_diff`].

use crate::char_diff::refine_line_diff;
use crate::deadline::Deadline;
use crate::dp::dp_diff;
use crate::heuristics::{optimize_sequence_diffs, remove_very_short_matching_lines_between_diffs};
use crate::interner::StringInterner;
use crate::myers::myers_diff;
use crate::range_mapping::build_detailed_mappings;
use crate::seqdiff::SequenceDiff;
use crate::sequence::LineSequence;
use crate::types::{DiffOptions, DetailedLineRangeMapping, RangeMapping};

/// Below this combined line count, DP (with the line-aware equality scorer) is used; at or
/// above it, Myers.
const LINE_ALGORITHM_THRESHOLD: usize = 1700;

/// Run the full line-level pipeline and produce the final `changes` list plus `hit_timeout`.
pub fn compute_lines_diff(
    original: &[String],
    modified: &[String],
    options: &DiffOptions,
) -> (Vec<DetailedLineRangeMapping>, bool) {
    let deadline = Deadline::from_millis(options.max_computation_time_ms);

    let mut interner = StringInterner::with_capacity(original.len() + modified.len());
    let key = |line: &str| if options.ignore_trim_whitespace { line.trim() } else { line };
    let hashes1: Vec<u32> = original.iter().map(|l| interner.get_or_create(key(l))).collect();
    let hashes2: Vec<u32> = modified.iter().map(|l| interner.get_or_create(key(l))).collect();

    let seq1 = LineSequence::new(original.to_vec(), hashes1);
    let seq2 = LineSequence::new(modified.to_vec(), hashes2);

    let total = seq1.length() + seq2.length();
    log::debug!(
        "compute_lines_diff: {} original lines, {} modified lines, algorithm={}",
        original.len(),
        modified.len(),
        if total < LINE_ALGORITHM_THRESHOLD { "dp" } else { "myers" }
    );
    let (mut diffs, mut hit_timeout) = if total < LINE_ALGORITHM_THRESHOLD {
        dp_diff(&seq1, &seq2, &deadline, line_equality_score)
    } else {
        myers_diff(&seq1, &seq2, &deadline)
    };

    diffs = optimize_sequence_diffs(&seq1, &seq2, diffs);
    diffs = remove_very_short_matching_lines_between_diffs(original, diffs);

    let mut alignments: Vec<RangeMapping> = Vec::new();

    // Step 6: whitespace-only-line rescan. For every matched (unchanged-per-the-diff-list) line
    // pair that shares a hash but differs byte-for-byte, refine the single-line region — only
    // meaningful when hashing was whitespace-insensitive and whitespace is still significant for
    // the user-visible result.
    if !options.ignore_trim_whitespace {
        for (i, j) in matched_pairs(seq1.length(), seq2.length(), &diffs) {
            if seq1.hash_at(i) == seq2.hash_at(j) && seq1.line(i) != seq2.line(j) {
                let region = SequenceDiff::new(i, i + 1, j, j + 1);
                let (mappings, timeout) = refine_line_diff(original, modified, &region, options, &deadline);
                hit_timeout |= timeout;
                alignments.extend(mappings);
            }
        }
    }

    // Step 7: refine every line-level diff at character level.
    for d in &diffs {
        let (mappings, timeout) = refine_line_diff(original, modified, d, options, &deadline);
        hit_timeout |= timeout;
        alignments.extend(mappings);
    }
    alignments.sort_by_key(|m| (m.original.start, m.modified.start));

    let changes = build_detailed_mappings(alignments);
    (changes, hit_timeout)
}

/// The DP scorer used for line-level diffing (spec §4.9 step 3): favors matching long, exactly
/// equal lines over empty or whitespace-only-equal ones.
fn line_equality_score(seq1: &LineSequence, seq2: &LineSequence, i: usize, j: usize) -> f64 {
    let line = seq1.line(i);
    if line.is_empty() {
        0.1
    } else if line == seq2.line(j) {
        1.0 + (1.0 + line.len() as f64).ln()
    } else {
        0.99
    }
}

/// Enumerate the `(i, j)` index pairs implicitly matched by an unchanged gap between diffs (and
/// before the first / after the last diff).
fn matched_pairs(len1: usize, len2: usize, diffs: &[SequenceDiff]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut c1 = 0usize;
    let mut c2 = 0usize;
    for d in diffs {
        while c1 < d.seq1_start && c2 < d.seq2_start {
            pairs.push((c1, c2));
            c1 += 1;
            c2 += 1;
        }
        c1 = d.seq1_end;
        c2 = d.seq2_end;
    }
    while c1 < len1 && c2 < len2 {
        pairs.push((c1, c2));
        c1 += 1;
        c2 += 1;
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_yield_no_changes() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let opts = DiffOptions::default();
        let (changes, timeout) = compute_lines_diff(&lines, &lines, &opts);
        assert!(changes.is_empty());
        assert!(!timeout);
    }

    #[test]
    fn single_line_change_produces_one_change() {
        let a = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let b = vec!["a".to_string(), "X".to_string(), "c".to_string()];
        let opts = DiffOptions::default();
        let (changes, _) = compute_lines_diff(&a, &b, &opts);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].original.start, 2);
        assert_eq!(changes[0].original.end_exclusive, 3);
    }

    #[test]
    fn pure_insertion_produces_empty_original_range() {
        let a = vec!["a".to_string(), "c".to_string()];
        let b = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let opts = DiffOptions::default();
        let (changes, _) = compute_lines_diff(&a, &b, &opts);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].original.is_empty());
        assert_eq!(changes[0].modified.line_count(), 1);
    }

    #[test]
    fn empty_inputs_yield_no_changes() {
        let empty: Vec<String> = Vec::new();
        let opts = DiffOptions::default();
        let (changes, timeout) = compute_lines_diff(&empty, &empty, &opts);
        assert!(changes.is_empty());
        assert!(!timeout);
    }

    #[test]
    fn large_input_selects_myers_without_panicking() {
        let a: Vec<String> = (0..1000).map(|i| format!("line{i}")).collect();
        let mut b = a.clone();
        b[500] = "changed".to_string();
        let opts = DiffOptions::default();
        let (changes, _) = compute_lines_diff(&a, &b, &opts);
        assert_eq!(changes.len(), 1);
    }
}
