// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Host notification callbacks

use crate::compose::CaptureEvent;
use crate::Range;
use std::fmt;

type Notify = Option<Box<dyn FnMut() + Send>>;
type NotifyText = Option<Box<dyn FnMut(&str) + Send>>;

/// Callbacks fired synchronously by [`super::RichText`]
///
/// All are optional. Callbacks must not call back into the controller.
#[derive(Default)]
pub struct Callbacks {
    pub(crate) tap_highlight: NotifyText,
    pub(crate) tap_normal_text: Notify,
    pub(crate) wrap: Notify,
    pub(crate) unwrap: Notify,
    pub(crate) composing_started: Notify,
    pub(crate) composing_progress: NotifyText,
    pub(crate) composing_finished: NotifyText,
    pub(crate) text_changed: NotifyText,
    pub(crate) reached_character_limit: Notify,
    pub(crate) reached_line_limit: Notify,
    pub(crate) mention_requested: Notify,
    pub(crate) return_key: Notify,
    pub(crate) should_change_text: Option<Box<dyn FnMut(Range, &str) -> bool + Send>>,
    pub(crate) should_begin_editing: Option<Box<dyn FnMut() -> bool + Send>>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn set<T: ?Sized>(cb: &Option<Box<T>>) -> &'static str {
            if cb.is_some() {
                "Some(..)"
            } else {
                "None"
            }
        }
        f.debug_struct("Callbacks")
            .field("tap_highlight", &set(&self.tap_highlight))
            .field("tap_normal_text", &set(&self.tap_normal_text))
            .field("wrap", &set(&self.wrap))
            .field("unwrap", &set(&self.unwrap))
            .field("composing_started", &set(&self.composing_started))
            .field("composing_progress", &set(&self.composing_progress))
            .field("composing_finished", &set(&self.composing_finished))
            .field("text_changed", &set(&self.text_changed))
            .field("reached_character_limit", &set(&self.reached_character_limit))
            .field("reached_line_limit", &set(&self.reached_line_limit))
            .field("mention_requested", &set(&self.mention_requested))
            .field("return_key", &set(&self.return_key))
            .field("should_change_text", &set(&self.should_change_text))
            .field("should_begin_editing", &set(&self.should_begin_editing))
            .finish()
    }
}

fn notify(cb: &mut Notify) {
    if let Some(f) = cb.as_mut() {
        f();
    }
}

fn notify_text(cb: &mut NotifyText, text: &str) {
    if let Some(f) = cb.as_mut() {
        f(text);
    }
}

impl Callbacks {
    pub(crate) fn tap_highlight(&mut self, text: &str) {
        notify_text(&mut self.tap_highlight, text);
    }

    pub(crate) fn tap_normal_text(&mut self) {
        notify(&mut self.tap_normal_text);
    }

    pub(crate) fn wrap(&mut self) {
        notify(&mut self.wrap);
    }

    pub(crate) fn unwrap(&mut self) {
        notify(&mut self.unwrap);
    }

    pub(crate) fn text_changed(&mut self, text: &str) {
        notify_text(&mut self.text_changed, text);
    }

    pub(crate) fn reached_character_limit(&mut self) {
        notify(&mut self.reached_character_limit);
    }

    pub(crate) fn reached_line_limit(&mut self) {
        notify(&mut self.reached_line_limit);
    }

    pub(crate) fn mention_requested(&mut self) {
        notify(&mut self.mention_requested);
    }

    pub(crate) fn return_key(&mut self) {
        notify(&mut self.return_key);
    }

    pub(crate) fn should_change_text(&mut self, range: Range, replacement: &str) -> bool {
        match self.should_change_text.as_mut() {
            Some(f) => f(range, replacement),
            None => true,
        }
    }

    pub(crate) fn should_begin_editing(&mut self) -> bool {
        match self.should_begin_editing.as_mut() {
            Some(f) => f(),
            None => true,
        }
    }

    pub(crate) fn capture(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Started => notify(&mut self.composing_started),
            CaptureEvent::Progress(token) => notify_text(&mut self.composing_progress, &token),
            CaptureEvent::Finished(token) => notify_text(&mut self.composing_finished, &token),
        }
    }
}

macro_rules! setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident ( $($arg:ty),* ) $(-> $ret:ty)?;)*) => {
        impl<L: crate::layout::LayoutOracle> super::RichText<L> {
            $(
                $(#[$doc])*
                pub fn $name<F: FnMut($($arg),*) $(-> $ret)? + Send + 'static>(&mut self, f: F) {
                    self.callbacks.$field = Some(Box::new(f));
                }
            )*
        }
    };
}

setters! {
    /// Called with the text of a tapped highlight
    on_tap_highlight => tap_highlight(&str);
    /// Called when a tap hits no highlight
    on_tap_normal_text => tap_normal_text();
    /// Called when tapping the wrap marker collapses the text
    on_wrap => wrap();
    /// Called when tapping the unwrap marker expands the text
    on_unwrap => unwrap();
    /// Called when topic capture begins
    on_composing_started => composing_started();
    /// Called with the partial topic while it is typed
    on_composing_progress => composing_progress(&str);
    /// Called with the final topic when capture ends
    on_composing_finished => composing_finished(&str);
    /// Called with the new source text after it changed
    on_text_changed => text_changed(&str);
    /// Called when an edit was cut to the character limit
    on_reached_character_limit => reached_character_limit();
    /// Called when an edit was denied by the line limit
    on_reached_line_limit => reached_line_limit();
    /// Called when `"@"` is typed with mention highlighting enabled
    ///
    /// The insertion is denied; the host is expected to insert a completed
    /// mention (e.g. via [`super::RichText::insert_text`]).
    on_mention_requested => mention_requested();
    /// Called when a line break is typed
    on_return => return_key();
    /// Final veto over an edit, after the built-in rules
    on_should_change_text => should_change_text(Range, &str) -> bool;
    /// Veto over beginning an edit session
    on_should_begin_editing => should_begin_editing() -> bool;
}
