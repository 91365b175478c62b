//! Multi-stage line/character diff engine for side-by-side visual diff editors.
//!
//! Mirrors a well-known editor's diff widget: a line-level pass (Myers or DP, chosen by input
//! size) narrows the input down to changed line ranges, a character-level pass refines each
//! changed range into precise sub-line highlights, and a set of heuristics clean up the result
//! so it reads the way a human would group the edit, not just the way the algorithm found it.
//!
//! [`compute_diff`] and [`compute_diff_render_plan`] are the only entry points a caller needs.
//!
//! Internals:
//!
//! - [`types`] holds the public data model (positions, ranges, mappings, options).
//! - [`utf`] and [`interner`] are the shared codec/interning support.
//! - [`sequence`] is the `Sequence` trait both algorithms and heuristics are generic over.
//! - [`myers`] and [`dp`] are the two diff algorithms.
//! - [`heuristics`], [`word_extend`], and [`short_text`] are the post-processing passes.
//! - [`line_diff`] and [`char_diff`] are the two orchestration layers built on top of those.
//! - [`range_mapping`] converts character-level output into the final line-range shape.
//! - [`render_plan`] builds the row-aligned view for a side-by-side renderer.
//! - [`textdump`] is the textual dump format used for self-check testing.

pub mod char_diff;
pub mod deadline;
pub mod dp;
pub mod heuristics;
pub mod interner;
pub mod line_diff;
pub mod myers;
pub mod range_mapping;
pub mod render_plan;
pub mod seqdiff;
pub mod sequence;
pub mod short_text;
pub mod textdump;
pub mod types;
pub mod utf;
pub mod word_extend;

pub use types::{
    CharHighlight, CharRange, DetailedLineRangeMapping, DiffOptions, LineRange, LineTag, LinesDiff,
    Position, RangeMapping, RenderPlan, RenderRow, RenderSide,
};

/// Diff `original` against `modified` and return the line-level changes with character-level
/// inner changes. Never fails: a degenerate partial result with `hit_timeout = true` is returned
/// if `options.max_computation_time_ms` is exceeded.
pub fn compute_diff(original: &[String], modified: &[String], options: &DiffOptions) -> LinesDiff {
    log::debug!("compute_diff: {} original lines, {} modified lines", original.len(), modified.len());
    let (changes, hit_timeout) = line_diff::compute_lines_diff(original, modified, options);
    if hit_timeout {
        log::warn!("compute_diff: hit max_computation_time_ms, returning a partial result");
    }
    LinesDiff { changes, moves: Vec::new(), hit_timeout }
}

/// Convenience wrapper: run [`compute_diff`], then build the render plan from its result. Never
/// a separate pipeline, so the two can never disagree.
pub fn compute_diff_render_plan(original: &[String], modified: &[String], options: &DiffOptions) -> RenderPlan {
    let diff = compute_diff(original, modified, options);
    render_plan::build_render_plan(original, modified, &diff.changes)
}
