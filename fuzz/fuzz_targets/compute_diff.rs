#![no_main]

use diffcore::{compute_diff, DiffOptions};
use libfuzzer_sys::fuzz_target;

/// Derive two pseudo-random line vectors deterministically from the fuzz input: the first half
/// of the bytes (split on `\n`) is `original`, the second half is `modified`.
fn split_into_lines(data: &[u8]) -> (Vec<String>, Vec<String>) {
    let mid = data.len() / 2;
    let (a, b) = data.split_at(mid);
    let to_lines = |chunk: &[u8]| {
        String::from_utf8_lossy(chunk).split('\n').map(|s| s.to_string()).collect::<Vec<_>>()
    };
    (to_lines(a), to_lines(b))
}

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 { &data[..64 * 1024] } else { data };
    let (original, modified) = split_into_lines(data);

    for options in [
        DiffOptions::default(),
        DiffOptions { ignore_trim_whitespace: true, ..DiffOptions::default() },
        DiffOptions { extend_to_subwords: true, ..DiffOptions::default() },
        DiffOptions { max_computation_time_ms: 1, ..DiffOptions::default() },
    ] {
        let diff = compute_diff(&original, &modified, &options);

        let mut prev_end: Option<(u32, u32)> = None;
        for change in &diff.changes {
            assert!(change.original.start <= change.original.end_exclusive);
            assert!(change.modified.start <= change.modified.end_exclusive);
            assert!(change.original.end_exclusive <= original.len() as u32 + 1);
            assert!(change.modified.end_exclusive <= modified.len() as u32 + 1);
            if let Some((ps, pm)) = prev_end {
                assert!(change.original.start >= ps);
                assert!(change.modified.start >= pm);
            }
            prev_end = Some((change.original.end_exclusive, change.modified.end_exclusive));

            let mut prev_inner_end = None;
            for inner in &change.inner_changes {
                assert!(inner.original.start <= inner.original.end);
                assert!(inner.modified.start <= inner.modified.end);
                assert!(inner.original.start.line >= change.original.start);
                assert!(inner.modified.start.line >= change.modified.start);
                if let Some(prev) = prev_inner_end {
                    assert!(inner.original.start >= prev);
                }
                prev_inner_end = Some(inner.original.end);
            }
        }

        if original == modified {
            assert!(diff.changes.is_empty());
        }
    }
});
