// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Atomic deletion of highlighted spans

use crate::compose::is_token_text;
use crate::{MatchSpan, Range};

/// Widens deletions so that highlighted spans are removed whole
#[derive(Clone, Copy, Debug, Default)]
pub struct EditGuard<'a> {
    /// Current matches, ordered by start
    pub matches: &'a [MatchSpan],
    /// The token of an active topic capture, if the caret is past its anchor
    pub composing_token: Option<&'a str>,
}

impl<'a> EditGuard<'a> {
    /// Construct
    pub fn new(matches: &'a [MatchSpan], composing_token: Option<&'a str>) -> Self {
        EditGuard {
            matches,
            composing_token,
        }
    }

    /// Adjust a proposed deletion
    ///
    /// Each match which intersects the (growing) range or ends exactly at its
    /// start is merged in; matches are visited last-to-first. While a valid
    /// topic token is being composed the range is returned unchanged, since
    /// topics are edited char by char.
    pub fn adjust_deletion_range(&self, proposed: Range) -> Range {
        if self.composing_token.is_some_and(is_token_text) {
            return proposed;
        }

        let mut range = proposed;
        for span in self.matches.iter().rev() {
            if span.range.intersection(range).is_some() || span.range.end == range.start {
                range = range.union(span.range);
            }
        }
        if range != proposed {
            log::debug!("EditGuard: widened deletion {proposed:?} to {range:?}");
        }
        range
    }
}
