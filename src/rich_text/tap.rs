// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Tap resolution

use super::{RichText, Variant};
use crate::layout::LayoutOracle;
use crate::util::substring;
use crate::{DisplayState, Range, Vec2};

/// Distance by which a glyph's bounds are grown when hit-testing a tap
pub const TAP_TOLERANCE: f32 = 10.0;

/// Whether a tap on the end offset of a range hits the range
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TapBoundary {
    /// `start <= offset < end`
    Exclusive,
    /// `start <= offset <= end`
    Inclusive,
}

impl TapBoundary {
    /// Test `offset` against `range`
    #[inline]
    pub fn contains(self, range: Range, offset: usize) -> bool {
        match self {
            TapBoundary::Exclusive => range.includes(offset),
            TapBoundary::Inclusive => range.includes_end(offset),
        }
    }
}

/// The outcome of a tap
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapTarget {
    /// The unwrap marker: the text was expanded
    Unwrap,
    /// The wrap marker: the text was collapsed
    Wrap,
    /// A highlighted span with the given text
    Highlight(String),
    /// Anything else
    Normal,
}

impl<L: LayoutOracle> RichText<L> {
    /// Origin of the text container within the view
    fn text_origin(&self, width: f32) -> Vec2 {
        match self.variant {
            Variant::Editor => Vec2(
                self.env.insets.left + self.env.line_fragment_padding,
                self.env.insets.top,
            ),
            Variant::Label => {
                let Some(size) = self.size else {
                    return Vec2::ZERO;
                };
                let height = self.oracle.size_for_width(&self.rendered, width).height;
                Vec2(0.0, (size.height - height) / 2.0)
            }
        }
    }

    /// Resolve a tap at `point` (view coordinates)
    ///
    /// Fires the matching callback. When taps are disabled or nothing is
    /// configured, a label reports [`TapTarget::Normal`] while an editor
    /// ignores the tap (returns `None`).
    pub fn tap(&mut self, point: Vec2) -> Option<TapTarget> {
        if !self.env.tap_enabled || !self.has_highlight() {
            return match self.variant {
                Variant::Label => {
                    self.callbacks.tap_normal_text();
                    Some(TapTarget::Normal)
                }
                Variant::Editor => None,
            };
        }

        let width = self.clamp_width();
        let pos = point - self.text_origin(width);
        let offset = match self.variant {
            Variant::Label => self.oracle.char_index_at(&self.rendered, width, pos),
            Variant::Editor => self.oracle.text_index_nearest(&self.rendered, width, pos),
        };

        let bounds = self
            .oracle
            .glyph_bounds(&self.rendered, width, Range::with_len(offset, 1))
            .outset(TAP_TOLERANCE);
        if !bounds.contains(pos) {
            log::trace!("RichText::tap: {pos:?} is outside {bounds:?}");
            self.callbacks.tap_normal_text();
            return Some(TapTarget::Normal);
        }

        Some(self.tap_offset(offset))
    }

    /// Resolve a tap at a text offset (UTF-16) of the rendering
    ///
    /// Markers take priority over matches, which take priority over extra
    /// ranges. Fires the matching callback.
    pub fn tap_offset(&mut self, offset: usize) -> TapTarget {
        let boundary = self.variant.tap_boundary();

        if self.env.auto_wrap_line_count > 0 {
            let info = self.effective_wrap_info();
            let len = self.rendered.len();
            match self.state {
                DisplayState::Truncated => {
                    let hit = info.unwrap.rebased_tap_range(len);
                    if hit.is_some_and(|range| boundary.contains(range, offset)) {
                        self.unwrap();
                        if self.state == DisplayState::Expanded {
                            self.callbacks.unwrap();
                        }
                        return TapTarget::Unwrap;
                    }
                }
                DisplayState::Expanded => {
                    let hit = info.wrap.rebased_tap_range(len);
                    if hit.is_some_and(|range| boundary.contains(range, offset)) {
                        self.wrap();
                        self.callbacks.wrap();
                        return TapTarget::Wrap;
                    }
                }
                DisplayState::Normal => (),
            }
        }

        // highlights hidden behind the unwrap marker are not tappable
        let cut = match self.state {
            DisplayState::Truncated => self.source_cut(),
            _ => usize::MAX,
        };
        let hit = |range: Range| range.start() < cut && boundary.contains(range, offset);
        let text = self
            .highlighted_matches()
            .into_iter()
            .find(|span| hit(span.range))
            .map(|span| span.text)
            .or_else(|| {
                self.clipped_extra_ranges()
                    .find(|range| hit(*range))
                    .and_then(|range| substring(&self.source, range))
                    .map(str::to_string)
            });

        match text {
            Some(text) => {
                log::debug!("RichText::tap_offset: highlight {text:?} at {offset}");
                self.callbacks.tap_highlight(&text);
                TapTarget::Highlight(text)
            }
            None => {
                self.callbacks.tap_normal_text();
                TapTarget::Normal
            }
        }
    }
}
