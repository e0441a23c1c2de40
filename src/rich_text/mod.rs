// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Rich text controller
//!
//! [`RichText`] sits between a host text widget and a [`LayoutOracle`]. It
//! owns the source text and all highlight configuration, and rebuilds the
//! styled rendering whenever an input changes:
//!
//! 1.  take the source (snapshotting the host's text when the display state
//!     is [`DisplayState::Normal`])
//! 2.  apply the base style
//! 3.  apply the highlight style over matches, then over extra ranges
//! 4.  if clamping is configured, append the wrap marker (expanded) or
//!     truncate with the unwrap marker
//!
//! # Re-entrancy
//!
//! Assigning a rendering back to the host widget normally raises text and
//! selection events. Each re-render therefore stores a pending [`Render`]
//! and raises an "updating" flag: the host retrieves the rendering with
//! [`RichText::take_render`], applies it, then calls
//! [`RichText::render_applied`]. Text and selection events arriving in
//! between are ignored.

mod callbacks;
mod edit;
mod tap;

pub use callbacks::Callbacks;
pub use edit::EditDecision;
pub use tap::{TapBoundary, TapTarget, TAP_TOLERANCE};

use crate::clamp;
use crate::compose::TopicCapture;
use crate::env::{Action, Environment, UpdateEnv};
use crate::layout::{LayoutOracle, MonoLayout};
use crate::range_style::{StyleRangeData, StyleRangeGroup, DEFAULT_KEY};
use crate::util::{replace_range, substring, utf16_len};
use crate::{
    DisplayState, HighlightKind, HighlightKinds, MatchSpan, Matcher, PatternError, Range, Size,
    StyledText, WrapInfo,
};
use thiserror::Error;

/// Key of the style applied over regex matches
const MATCH_KEY: &str = "highlight_match_key";

/// Error returned by [`RichText::render`] when nothing is configured
#[derive(Error, Debug, PartialEq, Eq)]
#[error("neither highlighting nor line clamping is configured")]
pub struct NotConfigured;

/// The kind of host widget
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// A non-editable label
    ///
    /// Taps resolve to the character under the pointer; the text is
    /// vertically centred; the clamp width is the view width.
    #[default]
    Label,
    /// An editable text view
    ///
    /// Taps resolve to the nearest caret position; the text is inset by the
    /// environment's insets and line fragment padding.
    Editor,
}

impl Variant {
    /// The tap boundary policy of this variant
    pub fn tap_boundary(self) -> TapBoundary {
        match self {
            Variant::Label => TapBoundary::Exclusive,
            Variant::Editor => TapBoundary::Inclusive,
        }
    }
}

/// A rendering for the host to apply
#[derive(Clone, Debug, PartialEq)]
pub struct Render {
    /// The styled text
    pub text: StyledText,
    /// The selection to restore
    pub selection: Range,
}

/// Rich text controller
///
/// See the [module documentation](self).
#[derive(Debug)]
pub struct RichText<L: LayoutOracle = MonoLayout> {
    oracle: L,
    variant: Variant,
    env: Environment,
    kinds: HighlightKinds,
    extra_pattern: String,
    matcher: Matcher,
    extra_ranges: Vec<Range>,
    wrap_info: Option<WrapInfo>,
    placeholder: Option<String>,
    /// The host's current plain text
    text: String,
    /// The source snapshot
    source: String,
    source_styled: Option<StyledText>,
    rendered: StyledText,
    styled_shown: bool,
    selection: Range,
    state: DisplayState,
    capture: TopicCapture,
    size: Option<Size>,
    marked: bool,
    updating: bool,
    pending: Option<Render>,
    callbacks: Callbacks,
}

impl<L: LayoutOracle> RichText<L> {
    /// Construct with an empty text
    pub fn new(variant: Variant, oracle: L) -> Self {
        RichText {
            oracle,
            variant,
            env: Environment::default(),
            kinds: HighlightKinds::NONE,
            extra_pattern: String::new(),
            matcher: Matcher::default(),
            extra_ranges: vec![],
            wrap_info: None,
            placeholder: None,
            text: String::new(),
            source: String::new(),
            source_styled: None,
            rendered: StyledText::default(),
            styled_shown: false,
            selection: Range::default(),
            state: DisplayState::Normal,
            capture: TopicCapture::default(),
            size: None,
            marked: false,
            updating: false,
            pending: None,
            callbacks: Callbacks::default(),
        }
    }

    /// Construct a label
    pub fn label(oracle: L) -> Self {
        RichText::new(Variant::Label, oracle)
    }

    /// Construct an editor
    pub fn editor(oracle: L) -> Self {
        RichText::new(Variant::Editor, oracle)
    }

    /// The widget variant
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Access the layout oracle
    #[inline]
    pub fn oracle(&self) -> &L {
        &self.oracle
    }

    /// Read the environment
    #[inline]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Update the environment
    ///
    /// Re-renders once if any style-affecting value changed.
    pub fn update_env<F: FnOnce(&mut UpdateEnv)>(&mut self, f: F) {
        let mut update = UpdateEnv::new(&mut self.env);
        f(&mut update);
        let action = update.finish();
        if action >= Action::Render {
            self.update_text();
        }
    }

    /// The host's current plain text
    ///
    /// This is the rendered text (including any marker) after a render, or
    /// the edited text after an edit.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source text
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Assign a new text
    ///
    /// Resets the display state and cancels any topic capture. The caret
    /// moves to the end of the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.source_styled = None;
        self.assign_text();
    }

    /// Assign a pre-styled text
    ///
    /// The given styles replace the base style; highlights are applied on
    /// top.
    pub fn set_source_styled(&mut self, text: StyledText) {
        self.text = text.as_str().to_string();
        self.source_styled = Some(text);
        self.assign_text();
    }

    fn assign_text(&mut self) {
        self.set_state(DisplayState::Normal);
        self.capture.cancel();
        self.selection = Range::new(utf16_len(&self.text), utf16_len(&self.text));
        self.update_text();
        self.notify_text_changed();
    }

    /// The latest rendering
    #[inline]
    pub fn rendered(&self) -> &StyledText {
        &self.rendered
    }

    /// The current selection
    #[inline]
    pub fn selection(&self) -> Range {
        self.selection
    }

    /// The current display state
    #[inline]
    pub fn display_state(&self) -> DisplayState {
        self.state
    }

    fn set_state(&mut self, state: DisplayState) {
        if state != self.state {
            log::debug!("RichText: display state {:?} -> {state:?}", self.state);
            self.state = state;
        }
    }

    /// True while a topic is being composed
    #[inline]
    pub fn is_composing(&self) -> bool {
        self.capture.is_active()
    }

    /// The view size, once known
    #[inline]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Report a new view size
    ///
    /// When clamping is configured, any change of size re-renders.
    pub fn set_size(&mut self, size: Size) {
        if self.size == Some(size) {
            return;
        }
        self.size = Some(size);
        if self.env.auto_wrap_line_count > 0 {
            self.update_text();
        }
    }

    /// The width available to text lines
    ///
    /// Zero while the view size is unknown.
    pub fn clamp_width(&self) -> f32 {
        let Some(size) = self.size else {
            return 0.0;
        };
        match self.variant {
            Variant::Label => size.width,
            Variant::Editor => {
                let insets = self.env.insets;
                size.width - insets.left - insets.right - 2.0 * self.env.line_fragment_padding
            }
        }
    }

    /// The enabled highlight kinds
    #[inline]
    pub fn highlight_kinds(&self) -> HighlightKinds {
        self.kinds
    }

    /// Set the enabled highlight kinds
    ///
    /// Disabling topics while a topic is being composed finishes the capture.
    pub fn set_highlight_kinds(&mut self, kinds: HighlightKinds) {
        if kinds == self.kinds {
            return;
        }
        let matcher = match Matcher::compile(kinds, &self.extra_pattern) {
            Ok(matcher) => matcher,
            Err(err) => {
                log::error!("RichText::set_highlight_kinds: {err}");
                return;
            }
        };
        log::debug!("RichText: highlight kinds {kinds:?}");

        if !kinds.contains(HighlightKind::Topic) {
            let caret = self.selection.start();
            if let Some(event) = self.capture.finish(&self.text, caret) {
                self.callbacks.capture(event);
            }
        }
        self.kinds = kinds;
        self.matcher = matcher;
        self.update_text();
    }

    /// The extra pattern
    #[inline]
    pub fn extra_pattern(&self) -> &str {
        &self.extra_pattern
    }

    /// Set an extra pattern highlighted in addition to the enabled kinds
    ///
    /// The pattern uses the syntax of the `regex` crate. On error, the
    /// previous pattern stays in effect.
    pub fn set_extra_pattern(&mut self, pattern: &str) -> Result<(), PatternError> {
        let matcher = Matcher::compile(self.kinds, pattern).map_err(|err| {
            log::warn!("RichText::set_extra_pattern: rejected {pattern:?}: {err}");
            err
        })?;
        log::debug!("RichText: extra pattern {pattern:?}");
        self.extra_pattern = pattern.to_string();
        self.matcher = matcher;
        self.update_text();
        Ok(())
    }

    /// The extra highlighted ranges
    #[inline]
    pub fn extra_ranges(&self) -> &[Range] {
        &self.extra_ranges
    }

    /// Set extra highlighted ranges (UTF-16) of the source
    pub fn set_extra_ranges(&mut self, ranges: Vec<Range>) {
        self.extra_ranges = ranges;
        self.update_text();
    }

    /// The configured wrap markers, if any
    #[inline]
    pub fn wrap_info(&self) -> Option<&WrapInfo> {
        self.wrap_info.as_ref()
    }

    /// Set the wrap markers; `None` selects the default markers
    pub fn set_wrap_info(&mut self, info: Option<WrapInfo>) {
        self.wrap_info = info;
        self.update_text();
    }

    /// Build markers `"... " + unwrap_label` and `" " + wrap_label` in the
    /// current environment's style
    pub fn wrap_config(&self, unwrap_label: &str, wrap_label: &str) -> WrapInfo {
        WrapInfo::new(
            unwrap_label,
            wrap_label,
            &self.env.base_style(),
            &self.env.marker_label_style(),
        )
    }

    /// The markers in effect
    fn effective_wrap_info(&self) -> WrapInfo {
        match self.wrap_info.as_ref() {
            Some(info) => info.clone(),
            None => WrapInfo::default_markers(&self.env.base_style(), &self.env.marker_label_style()),
        }
    }

    /// The placeholder text
    #[inline]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Set the placeholder text
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    /// True when the placeholder should be shown
    #[inline]
    pub fn placeholder_visible(&self) -> bool {
        self.text.is_empty()
    }

    /// True if any highlighting or clamping is configured
    pub fn has_highlight(&self) -> bool {
        !self.kinds.is_empty()
            || self.env.auto_wrap_line_count > 0
            || !self.extra_ranges.is_empty()
            || !self.extra_pattern.is_empty()
    }

    /// The text matches are scanned over
    fn match_text(&self) -> &str {
        if self.state == DisplayState::Normal {
            &self.text
        } else {
            &self.source
        }
    }

    /// End of the source-derived part of the rendering
    ///
    /// A clamped rendering ends with a marker. Offsets below the cut are
    /// equal in the rendering and the source.
    fn source_cut(&self) -> usize {
        let len = self.rendered.len();
        let marker = match self.state {
            DisplayState::Normal => return len,
            DisplayState::Truncated => self.effective_wrap_info().unwrap.text.len(),
            DisplayState::Expanded => self.effective_wrap_info().wrap.text.len(),
        };
        len.saturating_sub(marker)
    }

    /// Map a range of the rendering onto the text edits apply to
    ///
    /// In a clamped state the range is clipped to the source-derived part,
    /// so that the marker never becomes content.
    fn source_range(&self, range: Range) -> Range {
        if self.state == DisplayState::Normal {
            return range;
        }
        let cut = self.source_cut();
        Range::new(range.start().min(cut), range.end().min(cut))
    }

    /// Apply an edit of the rendering
    ///
    /// Edits the source in a clamped state, keeping the hidden tail of a
    /// truncated text.
    fn edit_source(&self, range: Range, replacement: &str) -> String {
        replace_range(self.match_text(), self.source_range(range), replacement)
    }

    /// Current regex matches
    ///
    /// Scanned over the host's text in the normal state, otherwise over the
    /// source.
    pub fn highlighted_matches(&self) -> Vec<MatchSpan> {
        if !self.has_highlight() {
            return vec![];
        }
        self.matcher.scan(self.match_text()).collect()
    }

    /// Texts of the current matches followed by those of extra ranges
    ///
    /// Extra ranges are clipped to the source.
    pub fn highlighted_texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = self
            .highlighted_matches()
            .into_iter()
            .map(|span| span.text)
            .collect();
        texts.extend(
            self.clipped_extra_ranges()
                .filter_map(|range| substring(&self.source, range))
                .map(str::to_string),
        );
        texts
    }

    /// Extra ranges clipped to the source
    fn clipped_extra_ranges(&self) -> impl Iterator<Item = Range> + '_ {
        let all = Range::new(0, utf16_len(&self.source));
        self.extra_ranges
            .iter()
            .filter_map(move |range| range.intersection(all))
    }

    /// Number of lines the source occupies at `width`
    pub fn line_count_at(&self, width: f32) -> usize {
        clamp::line_count(&self.oracle, &self.base_styled(&self.source), width)
    }

    /// Size of the current rendering at `width`, rounded up
    pub fn size_for_width(&self, width: f32) -> Size {
        self.oracle.size_for_width(&self.rendered, width).ceil()
    }

    /// Expand clamped text
    ///
    /// Does nothing unless clamping is configured. Without a known width the
    /// text is marked expanded unconditionally; otherwise only if it does not
    /// fit the line limit.
    pub fn unwrap(&mut self) {
        if self.env.auto_wrap_line_count == 0 {
            return;
        }
        let width = self.clamp_width();
        if width > 0.0 {
            let count = self.line_count_at(width);
            if count <= self.env.auto_wrap_line_count {
                return;
            }
        }
        self.set_state(DisplayState::Expanded);
        self.update_text();
    }

    /// Collapse expanded text
    pub fn wrap(&mut self) {
        if self.state != DisplayState::Expanded {
            return;
        }
        self.set_state(DisplayState::Truncated);
        self.update_text();
    }

    /// Re-run the rendering pipeline
    ///
    /// Rendering on unchanged inputs yields identical output.
    pub fn render(&mut self) -> Result<&StyledText, NotConfigured> {
        if !self.has_highlight() {
            return Err(NotConfigured);
        }
        self.update_text();
        Ok(&self.rendered)
    }

    /// Take the pending rendering, if any
    ///
    /// The host must apply it, then call [`Self::render_applied`].
    pub fn take_render(&mut self) -> Option<Render> {
        self.pending.take()
    }

    /// Signal that the host finished applying a rendering
    pub fn render_applied(&mut self) {
        self.updating = false;
    }

    /// True between a re-render and [`Self::render_applied`]
    #[inline]
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    fn base_styled(&self, source: &str) -> StyledText {
        match self.source_styled.as_ref() {
            Some(styled) if styled.as_str() == source => styled.clone(),
            _ => StyledText::new(source, &self.env.base_style()),
        }
    }

    /// Build the full rendering of `source`
    fn compose(&mut self, source: &str) -> StyledText {
        let highlight = self.env.highlight_style();
        let mut group = StyleRangeGroup::new(None);
        let matches = self.matcher.scan(source).map(|span| span.range).collect();
        group.set_data(MATCH_KEY, StyleRangeData::new(Some(highlight.clone()), matches));
        group.set_data(
            DEFAULT_KEY,
            StyleRangeData::new(Some(highlight), self.extra_ranges.clone()),
        );
        let styled = group.add_to(self.base_styled(source), None);

        let limit = self.env.auto_wrap_line_count;
        if limit == 0 {
            return styled;
        }

        let info = self.effective_wrap_info();
        if self.state == DisplayState::Expanded {
            return styled.append(&info.wrap.text);
        }

        let width = self.clamp_width();
        let (styled, truncated) =
            clamp::truncate(&self.oracle, styled, width, limit, &info.unwrap.text);
        self.set_state(if truncated {
            DisplayState::Truncated
        } else {
            DisplayState::Normal
        });
        styled
    }

    /// Rebuild the rendering and queue it for the host
    fn update_text(&mut self) {
        if !self.has_highlight() {
            if self.state != DisplayState::Normal {
                // drop the marker of a clamped rendering
                self.text = self.source.clone();
                self.set_state(DisplayState::Normal);
            }
            self.source = self.text.clone();
            self.rendered = self.base_styled(&self.text);
            if self.styled_shown {
                // strip previously applied highlighting
                self.styled_shown = false;
                self.queue_render();
            }
            return;
        }

        if self.state == DisplayState::Normal {
            self.source = self.text.clone();
        }
        let source = self.source.clone();
        self.rendered = self.compose(&source);
        self.text = self.rendered.as_str().to_string();
        self.styled_shown = true;
        self.queue_render();
    }

    fn queue_render(&mut self) {
        let len = self.rendered.len();
        let selection = Range::new(self.selection.start().min(len), self.selection.end().min(len));
        self.selection = selection;
        self.updating = true;
        self.pending = Some(Render {
            text: self.rendered.clone(),
            selection,
        });
    }

    fn notify_text_changed(&mut self) {
        self.callbacks.text_changed(&self.source);
    }
}

impl<L: LayoutOracle + Default> Default for RichText<L> {
    fn default() -> Self {
        RichText::new(Variant::default(), L::default())
    }
}
