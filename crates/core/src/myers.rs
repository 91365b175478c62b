//! Myers O(ND) forward algorithm (spec §4.4).
//!
//! Standard edit-graph search: for increasing `d`, extend the furthest-reaching `x` on each
//! diagonal `k` by a snake of `element_at` equality hits, until the bottom-right corner is
//! reached. Backtracking the stored `V` vectors recovers the edit script, which is then
//! collapsed into a minimal, sorted, non-overlapping [`SequenceDiff`] list.

use crate::deadline::Deadline;
use crate::sequence::Sequence;
use crate::seqdiff::{debug_assert_sorted_and_disjoint, SequenceDiff};

/// Run Myers' algorithm. Returns `(diffs, hit_timeout)`.
///
/// On timeout, returns a single diff covering the whole of both sequences, per spec §4.4/§5.
pub fn myers_diff<S: Sequence>(seq1: &S, seq2: &S, deadline: &Deadline) -> (Vec<SequenceDiff>, bool) {
    let n = seq1.length();
    let m = seq2.length();
    if n == 0 && m == 0 {
        return (Vec::new(), false);
    }

    let max = n + m;
    let offset = max as isize;
    let mut v: Vec<isize> = vec![0; 2 * max + 1];
    let mut trace: Vec<Vec<isize>> = Vec::with_capacity(max + 1);
    let mut solved_d = None;

    'outer: for d in 0..=max {
        if deadline.expired() {
            log::debug!("myers_diff: deadline expired at d={d} (n={n}, m={m})");
            return (vec![SequenceDiff::everything_changed(n, m)], true);
        }
        trace.push(v.clone());

        let dd = d as isize;
        let mut k = -dd;
        while k <= dd {
            let idx = (k + offset) as usize;
            let mut x = if k == -dd || (k != dd && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while (x as usize) < n && (y as usize) < m && seq1.element_at(x as usize) == seq2.element_at(y as usize) {
                x += 1;
                y += 1;
            }

            v[idx] = x;

            if x as usize >= n && y as usize >= m {
                solved_d = Some(d);
                break 'outer;
            }
            k += 2;
        }
    }

    let Some(solved_d) = solved_d else {
        // No solution found within `max` steps is impossible for a correct Myers run
        // (max = n + m always suffices), but guard defensively rather than panic.
        log::debug!("myers_diff: no solution found within max steps (n={n}, m={m})");
        return (vec![SequenceDiff::everything_changed(n, m)], false);
    };

    let diffs = backtrack(n, m, solved_d, &trace, offset);
    debug_assert_sorted_and_disjoint(&diffs);
    (diffs, false)
}

#[derive(Debug, Clone, Copy)]
struct Step {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

fn backtrack(n: usize, m: usize, solved_d: usize, trace: &[Vec<isize>], offset: isize) -> Vec<SequenceDiff> {
    let mut x = n as isize;
    let mut y = m as isize;
    let mut steps_rev: Vec<Step> = Vec::new();

    for d in (0..=solved_d).rev() {
        let v = &trace[d];
        let dd = d as isize;
        let k = x - y;
        let idx = (k + offset) as usize;
        let prev_k = if k == -dd || (k != dd && v[idx - 1] < v[idx + 1]) { k + 1 } else { k - 1 };
        let prev_idx = (prev_k + offset) as usize;
        let prev_x = v[prev_idx];
        let prev_y = prev_x - prev_k;

        // The diagonal (snake) portion of this step, walked backwards.
        while x > prev_x && y > prev_y {
            steps_rev.push(Step { x0: (x - 1) as usize, y0: (y - 1) as usize, x1: x as usize, y1: y as usize });
            x -= 1;
            y -= 1;
        }

        // The single horizontal/vertical edge, except at d == 0 (the starting point itself).
        if d > 0 {
            steps_rev.push(Step { x0: prev_x as usize, y0: prev_y as usize, x1: x as usize, y1: y as usize });
        }

        x = prev_x;
        y = prev_y;
    }

    steps_rev.reverse();

    let mut regions: Vec<SequenceDiff> = Vec::new();
    let mut open: Option<SequenceDiff> = None;
    for step in steps_rev {
        let is_diagonal = step.x1 - step.x0 == step.y1 - step.y0 && step.x1 > step.x0;
        if is_diagonal {
            if let Some(region) = open.take() {
                regions.push(region);
            }
            continue;
        }
        match &mut open {
            Some(region) if region.seq1_end == step.x0 && region.seq2_end == step.y0 => {
                region.seq1_end = step.x1;
                region.seq2_end = step.y1;
            }
            _ => {
                if let Some(region) = open.take() {
                    regions.push(region);
                }
                open = Some(SequenceDiff::new(step.x0, step.x1, step.y0, step.y1));
            }
        }
    }
    if let Some(region) = open {
        regions.push(region);
    }

    regions
}
