// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! A deterministic fixed-advance layout

use super::{line_breaks, LayoutOracle, LineMetrics};
use crate::conv::{to_u32, to_usize};
use crate::{Font, Range, Rect, Size, StyledText, Vec2};

/// A laid-out char
#[derive(Clone, Copy, Debug)]
struct Glyph {
    byte: usize,
    index: u32,
    end: u32,
    advance: f32,
    size: f32,
    spacing: f32,
    space: bool,
    newline: bool,
}

/// A line: a range of glyphs plus metrics
#[derive(Clone, Debug)]
struct Line {
    glyphs: std::ops::Range<usize>,
    metrics: LineMetrics,
}

/// Fixed-advance layout
///
/// Every char advances by `font.size * advance_em` (using the font of its
/// style run or, if unset, [`MonoLayout::font`]); control characters have
/// zero advance. Lines break greedily at UAX #14 opportunities, with
/// trailing whitespace allowed to hang past the line end; a word wider than
/// the line is broken between chars. Text is left-aligned.
///
/// The line height is the largest font size on the line times
/// `line_height_em`; a style's line spacing is added below its line.
#[derive(Clone, Debug, PartialEq)]
pub struct MonoLayout {
    /// Font for text without a font attribute
    pub font: Font,
    /// Advance of each char, relative to the font size
    pub advance_em: f32,
    /// Line height, relative to the font size
    pub line_height_em: f32,
}

impl Default for MonoLayout {
    fn default() -> Self {
        MonoLayout {
            font: Font::default(),
            advance_em: 0.5,
            line_height_em: 1.25,
        }
    }
}

impl MonoLayout {
    /// Construct with the given default font
    pub fn new(font: Font) -> Self {
        MonoLayout {
            font,
            ..Default::default()
        }
    }

    fn glyphs(&self, text: &StyledText) -> Vec<Glyph> {
        let runs: Vec<_> = text.runs().collect();
        let mut run = 0;
        let mut index = 0u32;
        let mut glyphs = Vec::with_capacity(text.as_str().len());
        for (byte, c) in text.as_str().char_indices() {
            while run + 1 < runs.len() && runs[run].0.end <= index {
                run += 1;
            }
            let style = runs.get(run).map(|(_, style)| *style);
            let size = style
                .and_then(|s| s.font.as_ref())
                .unwrap_or(&self.font)
                .size;
            let spacing = style.and_then(|s| s.line_spacing).unwrap_or(0.0);
            let end = index + to_u32(c.len_utf16());
            glyphs.push(Glyph {
                byte,
                index,
                end,
                advance: if c.is_control() {
                    0.0
                } else {
                    size * self.advance_em
                },
                size,
                spacing,
                space: c.is_whitespace(),
                newline: matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'),
            });
            index = end;
        }
        glyphs
    }

    fn layout(&self, text: &StyledText, width: f32) -> (Vec<Glyph>, Vec<Line>) {
        let glyphs = self.glyphs(text);
        let wrap = width.is_finite() && width > 0.0;

        let mut ranges = vec![];
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut g = 0;
        for brk in line_breaks(text.as_str()) {
            let mut seg_end = g;
            while seg_end < glyphs.len() && glyphs[seg_end].byte < brk.offset() {
                seg_end += 1;
            }

            let segment = &glyphs[g..seg_end];
            let visible: f32 = match segment.iter().rposition(|gl| !gl.space) {
                Some(last) => segment[..=last].iter().map(|gl| gl.advance).sum(),
                None => 0.0,
            };
            if wrap && line_start < g && line_width + visible > width {
                ranges.push(line_start..g);
                line_start = g;
                line_width = 0.0;
            }

            for i in g..seg_end {
                let gl = &glyphs[i];
                // only reached when the segment alone is wider than the line
                if wrap && !gl.space && i > line_start && line_width + gl.advance > width {
                    ranges.push(line_start..i);
                    line_start = i;
                    line_width = 0.0;
                }
                line_width += gl.advance;
            }

            if brk.is_hard() && line_start < seg_end {
                ranges.push(line_start..seg_end);
                line_start = seg_end;
                line_width = 0.0;
            }
            g = seg_end;
        }
        if line_start < glyphs.len() {
            ranges.push(line_start..glyphs.len());
        }

        let mut lines = Vec::with_capacity(ranges.len());
        let mut top = 0.0;
        for range in ranges {
            let line = &glyphs[range.clone()];
            let first = &line[0];
            let last = &line[line.len() - 1];
            let width = match line.iter().rposition(|gl| !gl.space) {
                Some(n) => line[..=n].iter().map(|gl| gl.advance).sum(),
                None => 0.0,
            };
            let size = line.iter().map(|gl| gl.size).fold(0.0, f32::max);
            let bottom = top + size * self.line_height_em;
            lines.push(Line {
                glyphs: range,
                metrics: LineMetrics {
                    range: Range {
                        start: first.index,
                        end: last.end,
                    },
                    top,
                    bottom,
                    width,
                },
            });
            top = bottom + first.spacing;
        }

        (glyphs, lines)
    }

    fn default_line_height(&self) -> f32 {
        self.font.size * self.line_height_em
    }

    /// The line nearest vertical coordinate `y`
    fn line_at(lines: &[Line], y: f32) -> usize {
        let mut n = 0;
        for (i, line) in lines.iter().enumerate() {
            if line.metrics.top > y {
                break;
            }
            n = i;
        }
        n
    }
}

impl LayoutOracle for MonoLayout {
    fn lines(&self, text: &StyledText, width: f32) -> Vec<LineMetrics> {
        let (_, lines) = self.layout(text, width);
        lines.into_iter().map(|line| line.metrics).collect()
    }

    fn line_index_nearest(
        &self,
        text: &StyledText,
        width: f32,
        line: usize,
        x: f32,
    ) -> Option<usize> {
        let (glyphs, lines) = self.layout(text, width);
        let line = lines.get(line)?;
        let line_glyphs = &glyphs[line.glyphs.clone()];

        let mut best = line.metrics.range.start;
        let mut best_dist = f32::INFINITY;
        let mut try_best = |dist: f32, index| {
            if dist < best_dist {
                best = index;
                best_dist = dist;
            }
        };

        let mut pos = 0.0;
        for gl in line_glyphs {
            try_best((pos - x).abs(), gl.index);
            if gl.newline {
                break;
            }
            pos += gl.advance;
        }
        if !line_glyphs.last().map(|gl| gl.newline).unwrap_or(false) {
            try_best((pos - x).abs(), line.metrics.range.end);
        }

        Some(to_usize(best))
    }

    fn char_index_at(&self, text: &StyledText, width: f32, pos: Vec2) -> usize {
        let (glyphs, lines) = self.layout(text, width);
        let Some(line) = lines.get(Self::line_at(&lines, pos.1)) else {
            return 0;
        };

        let mut index = line.metrics.range.start;
        let mut x = 0.0;
        for gl in &glyphs[line.glyphs.clone()] {
            if gl.newline && gl.index > line.metrics.range.start {
                break;
            }
            index = gl.index;
            if pos.0 < x + gl.advance {
                break;
            }
            x += gl.advance;
        }
        to_usize(index)
    }

    fn glyph_bounds(&self, text: &StyledText, width: f32, range: Range) -> Rect {
        let (glyphs, lines) = self.layout(text, width);

        let mut bounds: Option<Rect> = None;
        let mut caret: Option<Rect> = None;
        for line in &lines {
            let height = line.metrics.bottom - line.metrics.top;
            let mut x = 0.0;
            for gl in &glyphs[line.glyphs.clone()] {
                if gl.index == range.start && caret.is_none() {
                    caret = Some(Rect::new(Vec2(x, line.metrics.top), Size::new(0.0, height)));
                }
                if range.start <= gl.index && gl.index < range.end {
                    let rect = Rect::new(
                        Vec2(x, line.metrics.top),
                        Size::new(gl.advance, height),
                    );
                    bounds = Some(match bounds {
                        Some(b) => b.union(&rect),
                        None => rect,
                    });
                }
                x += gl.advance;
            }
        }

        if let Some(bounds) = bounds {
            return bounds;
        }
        if let Some(caret) = caret {
            return caret;
        }
        // caret at the end of the text
        match lines.last() {
            Some(line) => {
                let x = glyphs[line.glyphs.clone()]
                    .iter()
                    .map(|gl| gl.advance)
                    .sum();
                Rect::new(
                    Vec2(x, line.metrics.top),
                    Size::new(0.0, line.metrics.bottom - line.metrics.top),
                )
            }
            None => Rect::new(Vec2::ZERO, Size::new(0.0, self.default_line_height())),
        }
    }
}
