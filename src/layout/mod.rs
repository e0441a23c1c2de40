// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Layout oracle: line breaking and measurement of styled text
//!
//! This library never shapes or rasterises text itself. All geometry comes
//! from an implementation of [`LayoutOracle`], normally a thin adapter over
//! the host's text system. [`MonoLayout`] is a deterministic built-in
//! implementation, useful for tests and for hosts with fixed-advance fonts.
//!
//! All queries are pure functions of `(text, width)`. Coordinates are
//! relative to the top-left of the text container (origin of the first
//! line).

mod linebreak;
mod mono;

pub use linebreak::{line_breaks, LineBreak};
pub use mono::MonoLayout;

use crate::{Range, Rect, Size, StyledText, Vec2};

/// Metrics of one laid-out line
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Text range, including any trailing whitespace and line terminator
    pub range: Range,
    /// Top of the line
    pub top: f32,
    /// Bottom of the line
    pub bottom: f32,
    /// Width of the visible content (excluding trailing whitespace)
    pub width: f32,
}

/// A line-breaking, measuring layout service
///
/// A `width` which is infinite or not positive disables wrapping.
pub trait LayoutOracle {
    /// Lay out `text`, returning its lines in order
    ///
    /// An empty text has no lines. A trailing line terminator does not
    /// produce an extra empty line.
    fn lines(&self, text: &StyledText, width: f32) -> Vec<LineMetrics>;

    /// Find the caret position on `line` nearest horizontal coordinate `x`
    ///
    /// Returns `None` only on invalid `line`.
    fn line_index_nearest(&self, text: &StyledText, width: f32, line: usize, x: f32)
        -> Option<usize>;

    /// Find the index of the character under (or nearest to) `pos`
    ///
    /// Unlike [`Self::text_index_nearest`], this never rounds to the
    /// following caret position. Returns 0 for an empty text.
    fn char_index_at(&self, text: &StyledText, width: f32, pos: Vec2) -> usize;

    /// Bounding rect of the glyphs of `range`
    ///
    /// An empty range yields a zero-width rect at the caret position.
    fn glyph_bounds(&self, text: &StyledText, width: f32, range: Range) -> Rect;

    /// Size required to display `text` at `width`
    fn size_for_width(&self, text: &StyledText, width: f32) -> Size {
        let lines = self.lines(text, width);
        let w = lines.iter().map(|line| line.width).fold(0.0, f32::max);
        let h = lines.last().map(|line| line.bottom).unwrap_or(0.0);
        Size::new(w, h)
    }

    /// Number of lines `text` occupies at `width`
    fn line_count(&self, text: &StyledText, width: f32) -> usize {
        self.lines(text, width).len()
    }

    /// Find the caret position nearest `pos`
    fn text_index_nearest(&self, text: &StyledText, width: f32, pos: Vec2) -> usize {
        let lines = self.lines(text, width);
        let mut n = 0;
        for (i, line) in lines.iter().enumerate() {
            if line.top > pos.1 {
                break;
            }
            n = i;
        }
        // None only when there are no lines
        self.line_index_nearest(text, width, n, pos.0).unwrap_or(0)
    }
}
