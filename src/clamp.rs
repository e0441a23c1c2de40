// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Line clamping: truncating styled text to a number of lines
//!
//! Truncation keeps as much of the last permitted line as leaves room for a
//! marker (e.g. `"... More"`) plus [`TRUNCATION_MARGIN`], then appends the
//! marker verbatim.

use crate::layout::LayoutOracle;
use crate::util::unit_before;
use crate::{Range, Size, Style, StyledText};

/// Space kept free between the truncated text and the end of the line
pub const TRUNCATION_MARGIN: f32 = 10.0;

/// Text of the default truncation marker
pub const DEFAULT_MARKER: &str = "... More";

/// Number of lines `text` occupies at `width`
///
/// A text ending with a line break counts an extra (empty) final line.
pub fn line_count<L: LayoutOracle + ?Sized>(oracle: &L, text: &StyledText, width: f32) -> usize {
    let mut count = oracle.line_count(text, width);
    if text.as_str().ends_with('\n') {
        count += 1;
    }
    count
}

/// Truncate `text` to `limit` lines at `width`, appending `marker`
///
/// Returns the result and whether truncation happened. A `limit` of zero or
/// a `width` which is not positive never truncates: an unknown width must
/// not cause destructive truncation.
pub fn truncate<L: LayoutOracle + ?Sized>(
    oracle: &L,
    text: StyledText,
    width: f32,
    limit: usize,
    marker: &StyledText,
) -> (StyledText, bool) {
    if limit == 0 || width.is_nan() || width <= 0.0 {
        return (text, false);
    }

    let count = line_count(oracle, &text, width);
    if count <= limit {
        return (text, false);
    }

    let marker_width = oracle.size_for_width(marker, width).width;
    let x = width - marker_width - TRUNCATION_MARGIN;
    // None only if the oracle is inconsistent with its own line count
    let Some(mut cut) = oracle.line_index_nearest(&text, width, limit - 1, x) else {
        return (text, false);
    };
    if unit_before(text.as_str(), cut) == Some(u16::from(b'\n')) {
        cut -= 1;
    }

    log::debug!("truncate: {count} lines to {limit} at width {width}; cut at {cut}");
    let result = text.slice(Range::new(0, cut)).append(marker);
    (result, true)
}

/// The default truncation marker, in the given style
pub fn default_marker(style: &Style) -> StyledText {
    StyledText::new(DEFAULT_MARKER, style)
}

/// Measure `text` at `width`, optionally clamped to `limit` lines
///
/// When `limit > 0` the text is first truncated, using `marker` or, if
/// `None`, [`DEFAULT_MARKER`] in the font of the text's first char. The
/// result is rounded up to whole units.
pub fn text_size<L: LayoutOracle + ?Sized>(
    oracle: &L,
    text: &StyledText,
    width: f32,
    limit: usize,
    marker: Option<&StyledText>,
) -> Size {
    if limit == 0 {
        return oracle.size_for_width(text, width).ceil();
    }

    let default;
    let marker = match marker {
        Some(marker) => marker,
        None => {
            let mut style = Style::new();
            style.font = text.style_at(0).and_then(|s| s.font.clone());
            default = default_marker(&style);
            &default
        }
    };
    let (text, _) = truncate(oracle, text.clone(), width, limit, marker);
    oracle.size_for_width(&text, width).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonoLayout;
    use crate::{Color, Font};

    // MonoLayout: 8 units per char, 20 per line
    const LOREM: &str = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do \
        eiusmod tempor incididunt ut labore et dolore magna aliqua";

    fn marker() -> StyledText {
        StyledText::plain("... ").append(&StyledText::new("More", &Style::new().with_color(Color::BLUE)))
    }

    #[test]
    fn count_trailing_newline() {
        let layout = MonoLayout::default();
        assert_eq!(line_count(&layout, &StyledText::plain("ab"), 100.0), 1);
        assert_eq!(line_count(&layout, &StyledText::plain("ab\n"), 100.0), 2);
        assert_eq!(line_count(&layout, &StyledText::plain(""), 100.0), 0);
    }

    #[test]
    fn unchanged_within_limit() {
        let layout = MonoLayout::default();
        let text = StyledText::plain("hello world");
        let (result, truncated) = truncate(&layout, text.clone(), 100.0, 1, &marker());
        assert!(!truncated);
        assert_eq!(result, text);
    }

    #[test]
    fn unknown_width_never_truncates() {
        let layout = MonoLayout::default();
        let text = StyledText::plain(LOREM);
        for width in [0.0, -5.0, f32::NAN] {
            let (result, truncated) = truncate(&layout, text.clone(), width, 1, &marker());
            assert!(!truncated);
            assert_eq!(result, text);
        }
        let (_, truncated) = truncate(&layout, text, 100.0, 0, &marker());
        assert!(!truncated);
    }

    #[test]
    fn truncates_to_limit() {
        let layout = MonoLayout::default();
        // 20 chars per line
        let text = StyledText::plain("aaaa bbbb cccc dddd eeee ffff");
        assert_eq!(line_count(&layout, &text, 160.0), 2);
        let (result, truncated) = truncate(&layout, text, 160.0, 1, &marker());
        assert!(truncated);
        // x = 160 - 64 - 10 = 86, nearest caret at 88 (11 chars)
        assert_eq!(result.as_str(), "aaaa bbbb c... More");
        assert_eq!(result.style_at(15).and_then(|s| s.color), Some(Color::BLUE));
        assert_eq!(line_count(&layout, &result, 160.0), 1);
    }

    #[test]
    fn newline_before_cut() {
        let layout = MonoLayout::default();
        let text = StyledText::plain("a\n\nb\nc");
        let (result, truncated) = truncate(&layout, text, 200.0, 2, &marker());
        assert!(truncated);
        // the cut lands at the start of the empty second line
        assert_eq!(result.as_str(), "a... More");
    }

    #[test]
    fn exact_line_count() {
        let layout = MonoLayout::default();
        let text = StyledText::plain(LOREM);
        for width in [200.0, 256.0, 320.0] {
            for limit in 1..=3 {
                let before = line_count(&layout, &text, width);
                let (result, truncated) = truncate(&layout, text.clone(), width, limit, &marker());
                assert_eq!(truncated, before > limit);
                if truncated {
                    assert_eq!(line_count(&layout, &result, width), limit, "{width} {limit}");
                    assert!(result.as_str().ends_with(DEFAULT_MARKER));
                }
            }
        }
    }

    #[test]
    fn size() {
        let layout = MonoLayout::default();
        let text = StyledText::new(LOREM, &Style::new().with_font(Font::system(16.0)));
        let full = text_size(&layout, &text, 200.0, 0, None);
        let clamped = text_size(&layout, &text, 200.0, 2, None);
        assert_eq!(clamped.height, 40.0);
        assert!(full.height > clamped.height);
        assert_eq!(
            text_size(&layout, &StyledText::plain("abc"), 100.0, 0, None),
            Size::new(24.0, 20.0)
        );
    }
}
