// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Highlight matching: mentions, topics, links and custom patterns
//!
//! Enabled kinds plus an optional extra pattern are compiled into a single
//! alternation, tried in the fixed order mention, topic, link, extra. Matches
//! are leftmost-first and never overlap.
//!
//! The built-in kinds are terminated by a following space (or, for mentions
//! and links, the end of the text). Since the `regex` crate has no
//! look-around, each kind consumes its terminator and reports only its
//! capture group; scanning resumes directly after the reported span so that
//! the terminator remains available to the next match.

use crate::util::Utf16Cursor;
use crate::Range;
use bitflags::bitflags;
use regex::{Captures, Regex};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use thiserror::Error;

const MENTION_GROUP: &str = "hl_mention";
const TOPIC_GROUP: &str = "hl_topic";
const LINK_GROUP: &str = "hl_link";
const EXTRA_GROUP: &str = "hl_extra";

const MENTION_PATTERN: &str = r"(?P<hl_mention>@[^@# \n]+)(?: |\z)";
const TOPIC_PATTERN: &str = r"(?P<hl_topic>#[^@# \n]+) ";
const LINK_PATTERN: &str = r"(?P<hl_link>https?://[-A-Za-z0-9+&@#/%?=~_|!:,.;]+)(?: |\z)";

/// Error returned when a highlight pattern does not compile
#[derive(Error, Debug)]
#[error("invalid highlight pattern")]
pub struct PatternError(#[from] regex::Error);

/// A category of built-in highlighting
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HighlightKind {
    /// `@name`, terminated by a space or the end of the text
    Mention,
    /// `#topic`, terminated by a space
    Topic,
    /// `http://` or `https://` URL, terminated by a space or the end of the text
    Link,
}

impl HighlightKind {
    /// All kinds, in pattern order
    pub const ALL: [HighlightKind; 3] = [
        HighlightKind::Mention,
        HighlightKind::Topic,
        HighlightKind::Link,
    ];

    fn bit(self) -> KindBits {
        match self {
            HighlightKind::Mention => KindBits::MENTION,
            HighlightKind::Topic => KindBits::TOPIC,
            HighlightKind::Link => KindBits::LINK,
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            HighlightKind::Mention => MENTION_PATTERN,
            HighlightKind::Topic => TOPIC_PATTERN,
            HighlightKind::Link => LINK_PATTERN,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    struct KindBits: u8 {
        const MENTION = 1 << 0;
        const TOPIC = 1 << 1;
        const LINK = 1 << 2;
    }
}

/// A set of [`HighlightKind`]s
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HighlightKinds(KindBits);

impl HighlightKinds {
    /// The empty set
    pub const NONE: HighlightKinds = HighlightKinds(KindBits::empty());
    /// All kinds
    pub const ALL: HighlightKinds = HighlightKinds(KindBits::all());

    /// Construct from a list of kinds
    pub fn from_kinds(kinds: &[HighlightKind]) -> Self {
        kinds.iter().copied().collect()
    }

    /// True if no kind is enabled
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// True if `kind` is enabled
    #[inline]
    pub fn contains(self, kind: HighlightKind) -> bool {
        self.0.contains(kind.bit())
    }

    /// Enable `kind`
    #[inline]
    pub fn insert(&mut self, kind: HighlightKind) {
        self.0.insert(kind.bit());
    }

    /// Disable `kind`
    #[inline]
    pub fn remove(&mut self, kind: HighlightKind) {
        self.0.remove(kind.bit());
    }

    /// Return a copy with `kind` enabled
    #[inline]
    pub fn with(mut self, kind: HighlightKind) -> Self {
        self.insert(kind);
        self
    }

    /// Iterate enabled kinds in pattern order
    pub fn iter(self) -> impl Iterator<Item = HighlightKind> {
        HighlightKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    /// Build the combined pattern source
    ///
    /// Returns an empty string when no kind is enabled and `extra` is empty.
    pub fn pattern(self, extra: &str) -> String {
        let mut patterns: Vec<String> = self.iter().map(|k| k.pattern().to_string()).collect();
        if !extra.is_empty() {
            patterns.push(format!("(?P<{EXTRA_GROUP}>{extra})"));
        }
        patterns.join("|")
    }
}

impl Default for HighlightKinds {
    fn default() -> Self {
        HighlightKinds::NONE
    }
}

impl From<HighlightKind> for HighlightKinds {
    fn from(kind: HighlightKind) -> Self {
        HighlightKinds(kind.bit())
    }
}

impl FromIterator<HighlightKind> for HighlightKinds {
    fn from_iter<I: IntoIterator<Item = HighlightKind>>(iter: I) -> Self {
        let mut kinds = HighlightKinds::NONE;
        for kind in iter {
            kinds.insert(kind);
        }
        kinds
    }
}

/// Which alternative produced a [`MatchSpan`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Mention,
    Topic,
    Link,
    /// Matched by the caller-supplied extra pattern
    Extra,
}

/// A highlighted span of text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSpan {
    /// The matched text
    pub text: String,
    /// The matched range (UTF-16)
    pub range: Range,
    /// The alternative which matched
    pub kind: MatchKind,
}

/// A compiled highlight pattern
///
/// Compilation happens once per configuration change; scanning happens on
/// every re-render.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    kinds: HighlightKinds,
    extra: String,
    regex: Option<Regex>,
}

impl Matcher {
    /// Compile `kinds` plus an optional `extra` pattern
    ///
    /// The extra pattern uses the syntax of the [`regex`] crate. If it (or
    /// the combination) does not compile, an error is returned.
    pub fn compile(kinds: HighlightKinds, extra: &str) -> Result<Self, PatternError> {
        let source = kinds.pattern(extra);
        let regex = if source.is_empty() {
            None
        } else {
            Some(Regex::new(&source)?)
        };
        Ok(Matcher {
            kinds,
            extra: extra.to_string(),
            regex,
        })
    }

    /// The enabled kinds
    #[inline]
    pub fn kinds(&self) -> HighlightKinds {
        self.kinds
    }

    /// The extra pattern source
    #[inline]
    pub fn extra_pattern(&self) -> &str {
        &self.extra
    }

    /// True if this matcher can never match
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Scan `text` for matches
    ///
    /// Each call starts a new scan.
    pub fn scan<'m, 't>(&'m self, text: &'t str) -> Matches<'m, 't> {
        Matches {
            regex: self.regex.as_ref(),
            text,
            pos: 0,
            cursor: Utf16Cursor::new(text),
        }
    }
}

/// Iterator over the [`MatchSpan`]s of a text
///
/// Yielded by [`Matcher::scan`]. Spans are ordered by start offset and never
/// overlap. Empty matches (possible only with an extra pattern) are skipped.
#[derive(Debug)]
pub struct Matches<'m, 't> {
    regex: Option<&'m Regex>,
    text: &'t str,
    pos: usize,
    cursor: Utf16Cursor<'t>,
}

impl<'m, 't> Matches<'m, 't> {
    fn span(caps: &Captures<'t>) -> Option<(regex::Match<'t>, MatchKind)> {
        [
            (MENTION_GROUP, MatchKind::Mention),
            (TOPIC_GROUP, MatchKind::Topic),
            (LINK_GROUP, MatchKind::Link),
            (EXTRA_GROUP, MatchKind::Extra),
        ]
        .into_iter()
        .find_map(|(name, kind)| caps.name(name).map(|m| (m, kind)))
    }

    /// Advance `pos` past the char at `pos`
    fn step(&mut self) {
        self.pos += self.text[self.pos..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
    }
}

impl<'m, 't> Iterator for Matches<'m, 't> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        let regex = self.regex?;
        while self.pos <= self.text.len() {
            let caps = regex.captures_at(self.text, self.pos)?;
            let Some((m, kind)) = Self::span(&caps) else {
                // Unreachable with our alternation: every branch is a group
                self.pos = caps.get(0).map(|m| m.end()).unwrap_or(self.text.len());
                self.step();
                continue;
            };

            if m.is_empty() {
                self.pos = m.end();
                self.step();
                continue;
            }

            self.pos = m.end();
            let start = self.cursor.seek(m.start());
            let end = self.cursor.seek(m.end());
            return Some(MatchSpan {
                text: m.as_str().to_string(),
                range: Range::new(start, end),
                kind,
            });
        }
        None
    }
}

impl<'m, 't> FusedIterator for Matches<'m, 't> {}
