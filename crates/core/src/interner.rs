//! String interner: assigns dense sequential integer IDs to unique line strings.
//!
//! Shared across both line sequences of one [`crate::compute_diff`] call so that two lines
//! (trimmed identically, per `ignore_trim_whitespace`) receive the same ID in both sequences —
//! that equal ID is the fast hash-equality key the raw algorithms (`myers.rs`/`dp.rs`) use.
//! Collision handling is exact string equality only; the map owns its string copies and nothing
//! is ever removed.

use rustc_hash::FxHashMap;

/// Maps strings to dense `u32` IDs, assigning a new one on first insertion.
#[derive(Debug, Default)]
pub struct StringInterner {
    ids: FxHashMap<Box<str>, u32>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { ids: FxHashMap::default() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()) }
    }

    /// Return the ID for `s`, creating one if this is the first time `s` has been seen.
    pub fn get_or_create(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = self.ids.len() as u32;
        self.ids.insert(s.into(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
