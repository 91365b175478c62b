//! UTF-8 decoding and UTF-8/UTF-16 offset conversions.
//!
//! The diff pipeline is byte-based internally (Rust strings are UTF-8) but every column it
//! surfaces to callers is a UTF-16 code-unit index, to match a well-known editor's diff widget.
//! This module is the single place those conversions happen; nothing else in the crate should
//! do ad hoc UTF-16 arithmetic (see the "never mix byte counts and UTF-16 counts" design note).
//!
//! Invalid UTF-8 is tolerated throughout: [`decode_char`] returns `None` and the caller advances
//! by one byte, rather than failing the whole call.

/// Decode one code point starting at `bytes[pos]`.
///
/// Returns `Some((ch, len))` on success, where `len` is the number of bytes consumed. Returns
/// `None` if `pos` is out of bounds or does not begin a valid UTF-8 sequence; the caller should
/// advance `pos` by exactly one byte in that case (this function never advances past the start
/// byte itself).
pub fn decode_char(bytes: &[u8], pos: usize) -> Option<(char, usize)> {
    let rest = bytes.get(pos..)?;
    let s = std::str::from_utf8(rest).ok();
    if let Some(s) = s {
        let ch = s.chars().next()?;
        return Some((ch, ch.len_utf8()));
    }
    // `rest` may be invalid past some point; try decoding just the first code point via
    // `str::from_utf8` on successively shorter prefixes (at most 4 bytes for UTF-8).
    for len in (1..=4.min(rest.len())).rev() {
        if let Ok(s) = std::str::from_utf8(&rest[..len]) {
            if let Some(ch) = s.chars().next() {
                return Some((ch, len));
            }
        }
    }
    None
}

/// Number of UTF-16 code units needed to represent `text[byte_start..byte_end]`.
///
/// `text` must be valid UTF-8; `byte_start`/`byte_end` must be valid boundaries within it.
/// Code points below `U+10000` count as 1 unit, code points at or above count as 2 (the
/// surrogate pair).
pub fn utf16_len(text: &str, byte_start: usize, byte_end: usize) -> usize {
    text[byte_start..byte_end].chars().map(char::len_utf16).sum()
}

/// Convert a count of UTF-16 code units into the corresponding byte length within
/// `text[byte_start..]`, stopping exactly at that unit boundary.
///
/// Never splits a code point: if `utf16_count` lands inside a surrogate pair, the returned byte
/// length covers only the preceding, complete code points.
pub fn utf16_count_to_byte_len(text: &str, byte_start: usize, utf16_count: usize) -> usize {
    let mut units = 0usize;
    let mut consumed = 0usize;
    for ch in text[byte_start..].chars() {
        if units >= utf16_count {
            break;
        }
        let u16_len = ch.len_utf16();
        if units + u16_len > utf16_count {
            break;
        }
        units += u16_len;
        consumed += ch.len_utf8();
    }
    consumed
}

/// Number of Unicode scalar values (`char`s) in `text[byte_start..byte_end]`.
pub fn char_count(text: &str, byte_start: usize, byte_end: usize) -> usize {
    text[byte_start..byte_end].chars().count()
}
