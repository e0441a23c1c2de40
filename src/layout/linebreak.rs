// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Line-break opportunities (Unicode Standard Annex #14)

/// Indicator that a position is a line break opportunity, soft or hard.
/// Includes the offset (byte index) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineBreak {
    /// Soft line break (offset).
    Soft(usize),
    /// Hard line break (offset).
    Hard(usize),
}

impl LineBreak {
    /// Returns the offset of the line break, the index after the breaking character.
    #[inline]
    pub fn offset(&self) -> usize {
        match *self {
            LineBreak::Soft(offset) | LineBreak::Hard(offset) => offset,
        }
    }

    /// True for a mandatory break
    #[inline]
    pub fn is_hard(&self) -> bool {
        matches!(self, LineBreak::Hard(_))
    }
}

/// Iterate over line-break opportunities of `text`
///
/// Follows UAX #14, which effectively means breaking after spaces and
/// punctuation and between ideographs. A hard break is always reported at
/// the end of a non-empty text; text ending with a line terminator does not
/// get an additional break.
pub fn line_breaks(text: &str) -> impl Iterator<Item = LineBreak> + '_ {
    let mut last = None;
    xi_unicode::LineBreakIterator::new(text).filter_map(move |(offset, hard)| {
        if last == Some(offset) {
            return None;
        }
        last = Some(offset);
        Some(if hard {
            LineBreak::Hard(offset)
        } else {
            LineBreak::Soft(offset)
        })
    })
}
