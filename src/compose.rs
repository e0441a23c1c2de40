// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Topic capture: tracking a `#topic` token while it is typed

use crate::util::substring;
use crate::Range;

/// Characters which end a token
pub const TOKEN_DELIMITERS: [char; 4] = ['#', ' ', '@', '\n'];

/// True if `text` contains none of [`TOKEN_DELIMITERS`]
#[inline]
pub fn is_token_text(text: &str) -> bool {
    !text.contains(&TOKEN_DELIMITERS[..])
}

/// Lifecycle notification of a capture
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A capture began
    Started,
    /// The (non-empty) partial token changed
    Progress(String),
    /// The capture ended with the given token (possibly empty)
    Finished(String),
}

/// Topic-capture state machine
///
/// Idle until [`TopicCapture::start`] records an anchor: the offset
/// immediately after the trigger character. While composing, the token is
/// the text between the anchor and the caret. The capture finishes when the
/// caret moves before the anchor, when the token gains a delimiter, or on
/// explicit request.
///
/// All offsets are UTF-16 code units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopicCapture {
    anchor: Option<usize>,
}

impl TopicCapture {
    /// True while composing
    #[inline]
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// The anchor, if composing
    #[inline]
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// The token between the anchor and `caret`
    ///
    /// Returns `None` when idle, when the caret is before the anchor or when
    /// the range does not lie on char boundaries of `text`.
    pub fn current_token<'a>(&self, text: &'a str, caret: usize) -> Option<&'a str> {
        let anchor = self.anchor?;
        if caret < anchor {
            return None;
        }
        substring(text, Range::new(anchor, caret))
    }

    /// Start a capture at `anchor`
    ///
    /// An active capture is finished first, thus this yields either
    /// `[Started]` or `[Finished(..), Started]`.
    pub fn start(&mut self, text: &str, caret: usize, anchor: usize) -> Vec<CaptureEvent> {
        let mut events = Vec::with_capacity(2);
        events.extend(self.finish(text, caret));
        log::debug!("TopicCapture::start: anchor {anchor}");
        self.anchor = Some(anchor);
        events.push(CaptureEvent::Started);
        events
    }

    /// Finish the capture, if any
    pub fn finish(&mut self, text: &str, caret: usize) -> Option<CaptureEvent> {
        if !self.is_active() {
            return None;
        }
        let token = self.current_token(text, caret).unwrap_or("").to_string();
        log::debug!("TopicCapture::finish: {token:?}");
        self.anchor = None;
        Some(CaptureEvent::Finished(token))
    }

    /// Drop the capture without notification
    #[inline]
    pub fn cancel(&mut self) {
        self.anchor = None;
    }

    /// Track a caret move (or an edit, which moves the caret)
    ///
    /// While the token between anchor and caret is valid the capture stays
    /// active and reports progress for a non-empty token; otherwise it
    /// finishes. Does nothing when idle.
    pub fn on_selection(&mut self, text: &str, caret: usize) -> Option<CaptureEvent> {
        if !self.is_active() {
            return None;
        }
        match self.current_token(text, caret) {
            Some(token) if is_token_text(token) => {
                (!token.is_empty()).then(|| CaptureEvent::Progress(token.to_string()))
            }
            _ => self.finish(text, caret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CaptureEvent::*;

    #[test]
    fn delimiters() {
        assert!(is_token_text("swift"));
        assert!(is_token_text(""));
        for s in ["a b", "a#", "@a", "a\nb"] {
            assert!(!is_token_text(s));
        }
    }

    #[test]
    fn typing_a_topic() {
        let mut capture = TopicCapture::default();
        // "#" inserted at 0: anchor after the trigger
        assert_eq!(capture.start("", 0, 1), vec![Started]);
        assert_eq!(capture.on_selection("#", 1), None);

        let mut progress = vec![];
        let mut text = "#".to_string();
        for c in "swift".chars() {
            text.push(c);
            progress.extend(capture.on_selection(&text, text.len()));
        }
        assert_eq!(
            progress,
            ["s", "sw", "swi", "swif", "swift"]
                .map(|s| Progress(s.to_string()))
                .to_vec()
        );

        text.push(' ');
        assert_eq!(
            capture.on_selection(&text, text.len()),
            Some(Finished("swift".to_string()))
        );
        assert!(!capture.is_active());
        assert_eq!(capture.on_selection(&text, text.len()), None);
    }

    #[test]
    fn caret_before_anchor() {
        let mut capture = TopicCapture::default();
        capture.start("ab #", 4, 4);
        assert_eq!(capture.on_selection("ab #x", 5), Some(Progress("x".into())));
        // the anchor was deleted
        assert_eq!(capture.on_selection("ab ", 3), Some(Finished(String::new())));
    }

    #[test]
    fn second_trigger_finishes_first() {
        let mut capture = TopicCapture::default();
        capture.start("#", 1, 1);
        // a second "#" typed at 3: the anchor will follow it
        let events = capture.start("#ab", 3, 4);
        assert_eq!(events, vec![Finished("ab".to_string()), Started]);
        assert_eq!(capture.anchor(), Some(4));
    }

    #[test]
    fn utf16_token() {
        let mut capture = TopicCapture::default();
        capture.start("😀#", 3, 3);
        assert_eq!(capture.current_token("😀#音乐", 5), Some("音乐"));
        assert_eq!(capture.finish("😀#音乐", 5), Some(Finished("音乐".into())));
        assert_eq!(capture.finish("😀#音乐", 5), None);
    }
}
