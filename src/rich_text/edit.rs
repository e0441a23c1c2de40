// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Edit events of the editor variant

use super::RichText;
use crate::clamp;
use crate::compose::CaptureEvent;
use crate::edit_guard::EditGuard;
use crate::layout::LayoutOracle;
use crate::util::{edit_between, grapheme_count, grapheme_prefix, replace_range, utf16_len};
use crate::{DisplayState, HighlightKind, MatchSpan, Range};

/// Decision on a proposed edit
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditDecision {
    /// The host should apply the edit
    #[default]
    Allow,
    /// The host must drop the edit
    Deny,
    /// The edit was replaced by another; apply the pending rendering instead
    Handled,
}

impl<L: LayoutOracle> RichText<L> {
    fn emit(&mut self, events: impl IntoIterator<Item = CaptureEvent>) {
        for event in events {
            self.callbacks.capture(event);
        }
    }

    fn finish_capture(&mut self, caret: usize) {
        let event = self.capture.finish(&self.text, caret);
        self.emit(event);
    }

    /// Ask whether an edit session may begin
    pub fn should_begin_editing(&mut self) -> bool {
        self.callbacks.should_begin_editing()
    }

    /// Mark or unmark the text as being composed by an input method
    ///
    /// While marked, edits and selection changes are passed through
    /// unprocessed.
    pub fn set_marked_text(&mut self, marked: bool) {
        self.marked = marked;
    }

    /// True while an input method composes text
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Decide on a proposed replacement of `range` by `replacement`
    ///
    /// Rules apply in order: line breaks, topic and mention triggers,
    /// atomic deletion of highlights, the line limit and finally the host's
    /// veto. On [`EditDecision::Handled`] the controller already applied a
    /// (widened) deletion.
    pub fn text_will_change(&mut self, range: Range, replacement: &str) -> EditDecision {
        if self.updating || self.marked {
            log::trace!("RichText::text_will_change: ignored {range:?}");
            return EditDecision::Allow;
        }
        let topics = self.kinds.contains(HighlightKind::Topic);

        match replacement {
            "\n" => {
                self.callbacks.return_key();
                if !self.env.allow_newline {
                    return EditDecision::Deny;
                }
            }
            "#" if topics => {
                let events = self
                    .capture
                    .start(&self.text, range.start(), range.start() + 1);
                self.emit(events);
            }
            "@" => {
                if topics {
                    self.finish_capture(range.start());
                }
                if self.kinds.contains(HighlightKind::Mention) {
                    self.callbacks.mention_requested();
                    return EditDecision::Deny;
                }
            }
            " " if topics => self.finish_capture(range.start()),
            "" if !range.is_empty() => {
                if let Some(decision) = self.guard_deletion(range) {
                    return decision;
                }
            }
            _ => (),
        }

        let limit = self.env.text_limit_line;
        let width = self.clamp_width();
        if limit > 0 && width > 0.0 {
            let text = self.edit_source(range, replacement);
            let count = clamp::line_count(&self.oracle, &self.base_styled(&text), width);
            if count > limit {
                log::debug!("RichText: edit would produce {count} lines (limit {limit})");
                self.callbacks.reached_line_limit();
                return EditDecision::Deny;
            }
        }

        if !self.callbacks.should_change_text(range, replacement) {
            return EditDecision::Deny;
        }
        EditDecision::Allow
    }

    /// Widen a deletion over highlights; apply it if widened
    fn guard_deletion(&mut self, range: Range) -> Option<EditDecision> {
        let matches: Vec<MatchSpan> = self.matcher.scan(self.match_text()).collect();
        let caret = self.selection.start();
        let token = self.capture.current_token(&self.text, caret);
        let range = self.source_range(range);
        if range.is_empty() {
            // the deletion lies within a marker
            return None;
        }
        let adjusted = EditGuard::new(&matches, token).adjust_deletion_range(range);
        if adjusted == range {
            return None;
        }

        self.text = replace_range(self.match_text(), adjusted, "");
        self.selection = Range::new(adjusted.start(), adjusted.start());
        self.set_state(DisplayState::Normal);
        self.update_text();
        self.notify_text_changed();
        Some(EditDecision::Handled)
    }

    /// Report the host's text after an edit
    ///
    /// Enforces the character limit, tracks topic capture and re-renders.
    /// While the text is clamped, the edit is applied to the source; edits
    /// of the marker itself are dropped.
    pub fn text_did_change(&mut self, text: impl Into<String>, selection: Range) {
        if self.updating {
            log::trace!("RichText::text_did_change: ignored while updating");
            return;
        }
        let text = text.into();
        if self.marked {
            log::trace!("RichText::text_did_change: marked text");
            self.text = text;
            self.selection = selection;
            return;
        }

        if self.state == DisplayState::Normal {
            self.text = text;
            self.selection = selection;
        } else {
            let (range, inserted) = edit_between(self.rendered.as_str(), &text);
            let mapped = self.source_range(range);
            log::trace!("RichText::text_did_change: {range:?} maps to {mapped:?}");
            let source = self.edit_source(range, inserted);
            let len = utf16_len(&source);
            self.selection = if selection.is_empty() {
                let caret = (mapped.start() + utf16_len(inserted)).min(len);
                Range::new(caret, caret)
            } else {
                Range::new(selection.start().min(len), selection.end().min(len))
            };
            self.text = source;
            self.set_state(DisplayState::Normal);
        }

        let limit = self.env.text_limit_count;
        if limit > 0 && grapheme_count(&self.text) > limit {
            let text = grapheme_prefix(&self.text, limit).to_string();
            let len = utf16_len(&text);
            self.text = text;
            let sel = self.selection;
            self.selection = Range::new(sel.start().min(len), sel.end().min(len));
            self.callbacks.reached_character_limit();
        }

        self.set_state(DisplayState::Normal);
        self.track_selection();
        self.update_text();
        self.notify_text_changed();
    }

    /// Report a selection change
    ///
    /// Returns the selection the host should show, which differs from `sel`
    /// when the caret was moved out of a highlighted span.
    pub fn selection_did_change(&mut self, sel: Range) -> Range {
        if self.updating || self.marked {
            log::trace!("RichText::selection_did_change: ignored {sel:?}");
            return sel;
        }
        if sel == self.selection {
            return sel;
        }
        self.selection = sel;
        self.track_selection();
        self.selection
    }

    fn track_selection(&mut self) {
        if !self.selection.is_empty() {
            return;
        }
        let caret = self.selection.start();

        if self.capture.is_active() {
            let event = self.capture.on_selection(&self.text, caret);
            self.emit(event);
            if self.capture.is_active() {
                return;
            }
        }

        let len = utf16_len(&self.text);
        let snapped = self
            .matcher
            .scan(&self.text)
            .find(|span| span.range.start() < caret && caret <= span.range.end())
            .map(|span| (span.range.end() + 1).min(len));
        if let Some(snapped) = snapped {
            log::trace!("RichText: caret {caret} moved to {snapped}");
            self.selection = Range::new(snapped, snapped);
        }
    }

    /// Insert `text` at the selection
    ///
    /// Finishes any topic capture first. If `text` ends with `"#"` and topics
    /// are enabled, a new capture starts after it.
    pub fn insert_text(&mut self, text: &str) {
        let range = self.source_range(self.selection);
        self.finish_capture(range.start());

        self.text = self.edit_source(range, text);
        let caret = range.start() + utf16_len(text);
        self.selection = Range::new(caret, caret);
        if text.ends_with('#') && self.kinds.contains(HighlightKind::Topic) {
            let events = self.capture.start(&self.text, caret, caret);
            self.emit(events);
        }

        self.set_state(DisplayState::Normal);
        self.update_text();
        self.notify_text_changed();
    }

    /// Replace the token being composed by the completed `topic`
    ///
    /// The topic is inserted as `"#topic "` from the trigger character to the
    /// caret; a leading `"#"` or trailing `" "` in `topic` is not doubled.
    /// Does nothing unless a topic is being composed; an empty topic just
    /// finishes the capture.
    pub fn replace_composing_token(&mut self, topic: &str) {
        let Some(anchor) = self.capture.anchor() else {
            return;
        };
        let caret = self.selection.start();
        let name = topic.trim_start_matches('#').trim_end_matches(' ');
        if name.is_empty() {
            self.finish_capture(caret);
            return;
        }

        let replacement = format!("#{name} ");
        let range = Range::new(anchor.saturating_sub(1), caret.max(anchor));
        self.text = replace_range(&self.text, range, &replacement);
        let caret = range.start() + utf16_len(&replacement);
        self.selection = Range::new(caret, caret);
        self.capture.cancel();
        self.emit([CaptureEvent::Finished(name.to_string())]);

        self.set_state(DisplayState::Normal);
        self.update_text();
        self.notify_text_changed();
    }

    /// Finish topic capture, if active
    pub fn finish_composing_token(&mut self) {
        let caret = self.selection.start();
        self.finish_capture(caret);
    }
}
