// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Styled text: a string with style runs

use crate::conv::{to_u32, to_usize};
use crate::util::{utf16_len, utf16_to_byte_floor};
use crate::{Range, Style};
use smallvec::SmallVec;
use std::iter::FusedIterator;

/// A style run: `style` applies from `start` up to the next run's start
#[derive(Clone, Debug, PartialEq)]
struct Run {
    start: u32,
    style: Style,
}

/// Text with style attributes attached to ranges
///
/// Runs are stored as a sequence of start indices (UTF-16), each style
/// extending to the start of the next run, much like a list of format
/// specifiers. Invariants:
///
/// -   an empty text has no runs
/// -   otherwise the first run starts at 0 and starts are strictly increasing
///     and less than [`StyledText::len`]
/// -   adjacent runs have differing styles
///
/// The last invariant makes equality of two `StyledText` values meaningful:
/// equal text with equal attributes at every index compares equal regardless
/// of how the value was built.
///
/// Transformations take `self` by value and return the result, thus a value
/// observed by the host is never modified in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    len: u32,
    runs: SmallVec<[Run; 1]>,
}

impl StyledText {
    /// Construct with a single style over the whole text
    pub fn new(text: impl Into<String>, style: &Style) -> Self {
        let text = text.into();
        let len = to_u32(utf16_len(&text));
        let mut runs = SmallVec::new();
        if len > 0 {
            runs.push(Run {
                start: 0,
                style: style.clone(),
            });
        }
        StyledText { text, len, runs }
    }

    /// Construct without any style attributes
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        StyledText::new(text, &Style::default())
    }

    /// Access the unstyled text
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units
    #[inline]
    pub fn len(&self) -> usize {
        to_usize(self.len)
    }

    /// True if the text is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Range covering the whole text
    #[inline]
    pub fn full_range(&self) -> Range {
        Range::new(0, self.len())
    }

    /// Iterate over style runs as `(range, style)`
    pub fn runs(&self) -> RunIter<'_> {
        RunIter {
            text: self,
            index: 0,
        }
    }

    /// Get the style at `index`
    ///
    /// Returns `None` when `index` is not less than [`Self::len`].
    pub fn style_at(&self, index: usize) -> Option<&Style> {
        if index >= self.len() {
            return None;
        }
        let n = self.run_index(to_u32(index));
        Some(&self.runs[n].style)
    }

    /// Index of the run containing `index` (which must be `< len`)
    fn run_index(&self, index: u32) -> usize {
        match self.runs.binary_search_by_key(&index, |run| run.start) {
            Ok(n) => n,
            Err(n) => n - 1,
        }
    }

    /// Ensure a run starts exactly at `index`, returning its position
    ///
    /// `index` must satisfy `0 < index < len`.
    fn split_at(&mut self, index: u32) -> usize {
        match self.runs.binary_search_by_key(&index, |run| run.start) {
            Ok(n) => n,
            Err(n) => {
                let style = self.runs[n - 1].style.clone();
                self.runs.insert(n, Run {
                    start: index,
                    style,
                });
                n
            }
        }
    }

    /// Apply `f` to the style of every run within `range`
    fn map_range<F: Fn(&Style) -> Style>(mut self, range: Range, f: F) -> Self {
        let range = match range.intersection(self.full_range()) {
            Some(range) => range,
            None => return self,
        };

        let first = if range.start == 0 {
            0
        } else {
            self.split_at(range.start)
        };
        let last = if range.end == self.len {
            self.runs.len()
        } else {
            self.split_at(range.end)
        };

        for run in &mut self.runs[first..last] {
            run.style = f(&run.style);
        }
        self.coalesce();
        self
    }

    /// Merge adjacent runs with equal style
    fn coalesce(&mut self) {
        self.runs.dedup_by(|next, prev| next.style == prev.style);
    }

    /// Add attributes of `style` over `range`
    ///
    /// Attributes set by `style` replace existing values; all other
    /// attributes are kept. The range is clipped to the text.
    pub fn add_style(self, range: Range, style: &Style) -> Self {
        self.map_range(range, |old| old.merged(style))
    }

    /// Replace all attributes over `range` with `style`
    ///
    /// The range is clipped to the text.
    pub fn set_style(self, range: Range, style: &Style) -> Self {
        self.map_range(range, |_| style.clone())
    }

    /// Extract a sub-range (with styles)
    ///
    /// The range is clipped to the text; ends falling inside a surrogate
    /// pair are rounded down to a char boundary.
    pub fn slice(&self, range: Range) -> StyledText {
        let start_byte = utf16_to_byte_floor(&self.text, range.start());
        let end_byte = utf16_to_byte_floor(&self.text, range.end()).max(start_byte);
        let text = self.text[start_byte..end_byte].to_string();
        let start = to_u32(utf16_len(&self.text[..start_byte]));
        let len = to_u32(utf16_len(&text));
        let end = start + len;

        let mut runs = SmallVec::new();
        if len > 0 {
            let first = self.run_index(start);
            for run in &self.runs[first..] {
                if run.start >= end {
                    break;
                }
                runs.push(Run {
                    start: run.start.max(start) - start,
                    style: run.style.clone(),
                });
            }
        }

        StyledText { text, len, runs }
    }

    /// Append another styled text
    pub fn append(mut self, other: &StyledText) -> Self {
        let offset = self.len;
        self.text.push_str(&other.text);
        self.len += other.len;
        self.runs.extend(other.runs.iter().map(|run| Run {
            start: run.start + offset,
            style: run.style.clone(),
        }));
        self.coalesce();
        self
    }

    /// Remove `range` (with styles)
    pub fn delete(self, range: Range) -> Self {
        let head = self.slice(Range::new(0, range.start()));
        let tail = self.slice(Range::new(range.end(), self.len()));
        head.append(&tail)
    }

    /// Extract the unstyled text
    #[inline]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<&str> for StyledText {
    #[inline]
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    #[inline]
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}

/// Iterator over the style runs of a [`StyledText`]
///
/// Yielded by [`StyledText::runs`].
#[derive(Debug)]
pub struct RunIter<'a> {
    text: &'a StyledText,
    index: usize,
}

impl<'a> Iterator for RunIter<'a> {
    type Item = (Range, &'a Style);

    fn next(&mut self) -> Option<Self::Item> {
        let runs = &self.text.runs;
        let run = runs.get(self.index)?;
        self.index += 1;
        let end = runs
            .get(self.index)
            .map(|next| next.start)
            .unwrap_or(self.text.len);
        let range = Range {
            start: run.start,
            end,
        };
        Some((range, &run.style))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.text.runs.len() - self.index;
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for RunIter<'a> {}
impl<'a> FusedIterator for RunIter<'a> {}
