// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Utility functions over UTF-16 indices
//!
//! Rust strings are UTF-8 while all offsets exchanged with the host (ranges,
//! selections, tap offsets) count UTF-16 code units. These functions are the
//! single conversion layer between the two.

use crate::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Length of `text` in UTF-16 code units
#[inline]
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a byte index to a UTF-16 index
///
/// `byte` must be on a char boundary (or `text.len()`).
pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
    utf16_len(&text[..byte])
}

/// Convert a UTF-16 index to a byte index
///
/// Returns `None` if `index` is beyond the end of `text` or falls between
/// the two halves of a surrogate pair.
pub fn utf16_to_byte(text: &str, index: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, c) in text.char_indices() {
        if units == index {
            return Some(byte);
        } else if units > index {
            return None;
        }
        units += c.len_utf16();
    }
    (units == index).then_some(text.len())
}

/// Convert a UTF-16 index to a byte index, rounding down
///
/// Indices inside a surrogate pair resolve to the start of that char;
/// indices beyond the end resolve to `text.len()`.
pub fn utf16_to_byte_floor(text: &str, index: usize) -> usize {
    let mut units = 0;
    for (byte, c) in text.char_indices() {
        units += c.len_utf16();
        if units > index {
            return byte;
        }
    }
    text.len()
}

/// Sub-string over a UTF-16 range
///
/// Returns `None` if either end of the range is not a valid UTF-16 char
/// boundary of `text`.
pub fn substring(text: &str, range: Range) -> Option<&str> {
    let start = utf16_to_byte(text, range.start())?;
    let end = utf16_to_byte(text, range.end())?;
    Some(&text[start..end])
}

/// The UTF-16 code unit before `index`, if any
pub fn unit_before(text: &str, index: usize) -> Option<u16> {
    if index == 0 {
        return None;
    }
    text.encode_utf16().nth(index - 1)
}

/// Replace a UTF-16 range of `text` with `replacement`
///
/// The range is clamped to `text` and rounded outwards to char boundaries.
pub fn replace_range(text: &str, range: Range, replacement: &str) -> String {
    let start = utf16_to_byte_floor(text, range.start());
    let end = match utf16_to_byte(text, range.end()) {
        Some(end) => end,
        None => {
            // inside a surrogate pair or beyond the end: round up
            let floor = utf16_to_byte_floor(text, range.end());
            text[floor..]
                .chars()
                .next()
                .map(|c| floor + c.len_utf8())
                .unwrap_or(text.len())
        }
    };
    let end = end.max(start);
    let mut result = String::with_capacity(text.len() - (end - start) + replacement.len());
    result.push_str(&text[..start]);
    result.push_str(replacement);
    result.push_str(&text[end..]);
    result
}

/// The edit turning `old` into `new`
///
/// Returns the UTF-16 range of `old` that was replaced, together with its
/// replacement. The common prefix is matched first.
pub fn edit_between<'a>(old: &str, new: &'a str) -> (Range, &'a str) {
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    let (old, rest) = old.split_at(prefix);
    let new_rest = &new[prefix..];
    let suffix: usize = rest
        .chars()
        .rev()
        .zip(new_rest.chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    let removed = &rest[..rest.len() - suffix];
    let inserted = &new_rest[..new_rest.len() - suffix];
    (Range::with_len(utf16_len(old), utf16_len(removed)), inserted)
}

/// Number of user-perceived characters (extended grapheme clusters)
#[inline]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Prefix of `text` containing at most `limit` grapheme clusters
pub fn grapheme_prefix(text: &str, limit: usize) -> &str {
    match text.grapheme_indices(true).nth(limit) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Incremental byte → UTF-16 converter
///
/// Converting a monotonic sequence of byte offsets (e.g. regex matches) this
/// way is linear in the text length overall.
#[derive(Debug)]
pub(crate) struct Utf16Cursor<'a> {
    text: &'a str,
    byte: usize,
    units: usize,
}

impl<'a> Utf16Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Utf16Cursor {
            text,
            byte: 0,
            units: 0,
        }
    }

    /// Convert `byte`, which must be on a char boundary
    ///
    /// Seeking backwards restarts from the beginning.
    pub(crate) fn seek(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.units = 0;
        }
        self.units += utf16_len(&self.text[self.byte..byte]);
        self.byte = byte;
        self.units
    }
}
