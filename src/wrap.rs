// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Display state and wrap markers ("... More" / " Hide")

use crate::{Range, Style, StyledText};

/// Whether the text is shown in full or clamped
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayState {
    /// Full text; truncation not (yet) applied
    #[default]
    Normal,
    /// Clamped with the unwrap marker appended
    Truncated,
    /// Full text with the wrap marker appended
    Expanded,
}

/// A marker appended to the rendered text
#[derive(Clone, Debug, PartialEq)]
pub struct WrapMarker {
    /// The pre-styled marker text
    pub text: StyledText,
    /// The tappable part, relative to the start of the marker
    pub tap_range: Option<Range>,
}

impl WrapMarker {
    /// Construct
    pub fn new(text: StyledText, tap_range: Option<Range>) -> Self {
        WrapMarker { text, tap_range }
    }

    /// Build `prefix` in `base` followed by `label` in `label_style`
    ///
    /// The tap range covers the label.
    pub fn labelled(prefix: &str, label: &str, base: &Style, label_style: &Style) -> Self {
        let prefix = StyledText::new(prefix, base);
        let label = StyledText::new(label, label_style);
        let tap_range = Range::with_len(prefix.len(), label.len());
        WrapMarker {
            text: prefix.append(&label),
            tap_range: Some(tap_range),
        }
    }

    /// The tap range within a rendered text of `rendered_len`
    ///
    /// The marker sits at the tail of the rendered text.
    pub fn rebased_tap_range(&self, rendered_len: usize) -> Option<Range> {
        let offset = rendered_len.checked_sub(self.text.len())?;
        self.tap_range.map(|range| range.shifted(offset))
    }
}

/// The pair of markers used for clamping
#[derive(Clone, Debug, PartialEq)]
pub struct WrapInfo {
    /// Appended to truncated text; tap to expand
    pub unwrap: WrapMarker,
    /// Appended to expanded text; tap to collapse
    pub wrap: WrapMarker,
}

impl WrapInfo {
    /// Markers `"... " + unwrap_label` and `" " + wrap_label`
    pub fn new(unwrap_label: &str, wrap_label: &str, base: &Style, label_style: &Style) -> Self {
        WrapInfo {
            unwrap: WrapMarker::labelled("... ", unwrap_label, base, label_style),
            wrap: WrapMarker::labelled(" ", wrap_label, base, label_style),
        }
    }

    /// The default markers: `"... More"` and `" Hide"`
    pub fn default_markers(base: &Style, label_style: &Style) -> Self {
        WrapInfo::new("More", "Hide", base, label_style)
    }
}
