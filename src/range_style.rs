// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Range style sets: named styles, each attached to a list of ranges

use crate::{Range, Style, StyledText};
use indexmap::IndexMap;

/// Key used when none is specified
pub const DEFAULT_KEY: &str = "default_style_range_data_key";

/// A style plus the ranges it applies to
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRangeData {
    /// The style; when `None` the ranges are kept but nothing is applied
    pub style: Option<Style>,
    /// Ranges in UTF-16 code units
    pub ranges: Vec<Range>,
}

impl StyleRangeData {
    /// Construct
    pub fn new(style: Option<Style>, ranges: Vec<Range>) -> Self {
        StyleRangeData { style, ranges }
    }
}

/// An ordered group of keyed [`StyleRangeData`]
///
/// Styles are applied in key insertion order. Replacing the data of an
/// existing key keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRangeGroup {
    /// Style applied over the whole application scope before any keyed style
    pub base: Option<Style>,
    styles: IndexMap<String, StyleRangeData>,
}

impl StyleRangeGroup {
    /// Construct with an optional base style and no keyed styles
    pub fn new(base: Option<Style>) -> Self {
        StyleRangeGroup {
            base,
            styles: IndexMap::new(),
        }
    }

    /// Number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True if there are no keys
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Access the data stored under `key`
    pub fn data(&self, key: &str) -> Option<&StyleRangeData> {
        self.styles.get(key)
    }

    /// Access the style stored under `key`
    pub fn style(&self, key: &str) -> Option<&Style> {
        self.styles.get(key).and_then(|data| data.style.as_ref())
    }

    /// Access the ranges stored under `key`
    ///
    /// Returns an empty slice for an unknown key.
    pub fn ranges(&self, key: &str) -> &[Range] {
        self.styles
            .get(key)
            .map(|data| data.ranges.as_slice())
            .unwrap_or(&[])
    }

    /// Set the data under `key`
    pub fn set_data(&mut self, key: impl Into<String>, data: StyleRangeData) {
        self.styles.insert(key.into(), data);
    }

    /// Set the style under `key`, keeping existing ranges
    pub fn set_style(&mut self, key: impl Into<String>, style: Style) {
        self.styles.entry(key.into()).or_default().style = Some(style);
    }

    /// Set the ranges under `key`, keeping any existing style
    pub fn set_ranges(&mut self, key: impl Into<String>, ranges: Vec<Range>) {
        self.styles.entry(key.into()).or_default().ranges = ranges;
    }

    /// Remove `key`, returning its data
    ///
    /// The order of the remaining keys is preserved.
    pub fn remove(&mut self, key: &str) -> Option<StyleRangeData> {
        self.styles.shift_remove(key)
    }

    /// Render `source` with the base style, then apply keyed styles additively
    pub fn render(&self, source: &str, scope: Option<Range>) -> StyledText {
        let text = StyledText::new(source, self.base.as_ref().unwrap_or(&Style::default()));
        self.apply(text, true, scope)
    }

    /// Add styles to `text` over `scope` (whole text when `None`)
    ///
    /// Attributes are merged: a later style overrides only the attributes it
    /// sets.
    pub fn add_to(&self, mut text: StyledText, scope: Option<Range>) -> StyledText {
        if let Some(base) = self.base.as_ref() {
            let range = scope.unwrap_or(text.full_range());
            text = text.add_style(range, base);
        }
        self.apply(text, true, scope)
    }

    /// Set styles on `text` over `scope` (whole text when `None`)
    ///
    /// Existing attributes in each styled range are replaced.
    pub fn set_to(&self, mut text: StyledText, scope: Option<Range>) -> StyledText {
        if let Some(base) = self.base.as_ref() {
            let range = scope.unwrap_or(text.full_range());
            text = text.set_style(range, base);
        }
        self.apply(text, false, scope)
    }

    fn apply(&self, mut text: StyledText, adding: bool, scope: Option<Range>) -> StyledText {
        let scope = scope.unwrap_or(text.full_range());
        for data in self.styles.values() {
            let Some(style) = data.style.as_ref() else {
                continue;
            };
            for range in data.ranges.iter().filter_map(|r| r.intersection(scope)) {
                text = if adding {
                    text.add_style(range, style)
                } else {
                    text.set_style(range, style)
                };
            }
        }
        text
    }
}
