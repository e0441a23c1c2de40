// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types: points, sizes, rects and text ranges

use crate::conv::{to_u32, to_usize};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 2D vector (or point)
///
/// Usually used as either a coordinate or a difference of coordinates, but
/// may have some other uses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    /// Zero
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);

    /// Return this point translated by `(dx, dy)`
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Vec2(self.0 + dx, self.1 + dy)
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Vec2(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Vec2(self.0 - other.0, self.1 - other.1)
    }
}

/// A size: `(width, height)`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Construct
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// Round both components up to the next whole unit
    ///
    /// Measured text sizes are fractional; views want whole units so that
    /// the last line is never clipped.
    #[inline]
    pub fn ceil(self) -> Self {
        Size::new(self.width.ceil(), self.height.ceil())
    }
}

/// Edge insets (padding)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    /// Construct with the same value on every edge
    #[inline]
    pub const fn uniform(v: f32) -> Self {
        Insets {
            top: v,
            left: v,
            bottom: v,
            right: v,
        }
    }
}

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub pos: Vec2,
    pub size: Size,
}

impl Rect {
    /// Zero-sized rect at the origin
    pub const ZERO: Rect = Rect {
        pos: Vec2::ZERO,
        size: Size::ZERO,
    };

    /// Construct
    #[inline]
    pub fn new(pos: Vec2, size: Size) -> Self {
        Rect { pos, size }
    }

    /// The bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2(self.pos.0 + self.size.width, self.pos.1 + self.size.height)
    }

    /// Shrink by `insets`
    ///
    /// The size never becomes negative.
    pub fn inset(&self, insets: Insets) -> Self {
        let pos = self.pos.offset(insets.left, insets.top);
        let width = (self.size.width - insets.left - insets.right).max(0.0);
        let height = (self.size.height - insets.top - insets.bottom).max(0.0);
        Rect::new(pos, Size::new(width, height))
    }

    /// Grow by `d` in every direction
    pub fn outset(&self, d: f32) -> Self {
        Rect::new(
            self.pos.offset(-d, -d),
            Size::new(self.size.width + 2.0 * d, self.size.height + 2.0 * d),
        )
    }

    /// True if `p` lies within the rect (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        self.pos.0 <= p.0 && p.0 <= max.0 && self.pos.1 <= p.1 && p.1 <= max.1
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Self {
        let (a, b) = (self.max(), other.max());
        let pos = Vec2(self.pos.0.min(other.pos.0), self.pos.1.min(other.pos.1));
        let max = Vec2(a.0.max(b.0), a.1.max(b.1));
        Rect::new(pos, Size::new(max.0 - pos.0, max.1 - pos.1))
    }
}

/// Range type over text, measured in UTF-16 code units
///
/// This is a half-open interval `start..end`. The unit matches the indexing
/// of common host platform string and regex engines; see [`crate::util`] for
/// conversion to byte offsets of a `str`.
///
/// Constructors never produce `end < start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    /// Construct from `start` and `end`
    ///
    /// If `end < start` the range is collapsed to `start..start`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        let start = to_u32(start);
        Range {
            start,
            end: to_u32(end).max(start),
        }
    }

    /// Construct from a location and a length
    #[inline]
    pub fn with_len(location: usize, len: usize) -> Self {
        Range::new(location, location + len)
    }

    /// The start, as `usize`
    #[inline]
    pub fn start(self) -> usize {
        to_usize(self.start)
    }

    /// The end, as `usize`
    #[inline]
    pub fn end(self) -> usize {
        to_usize(self.end)
    }

    /// The number of code units covered
    #[inline]
    pub fn len(self) -> usize {
        to_usize(self.end - self.start)
    }

    /// True if the range covers nothing
    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True if `index` is within the half-open range
    #[inline]
    pub fn includes(self, index: usize) -> bool {
        self.start() <= index && index < self.end()
    }

    /// True if `index` is within the range or equal to its end
    #[inline]
    pub fn includes_end(self, index: usize) -> bool {
        self.start() <= index && index <= self.end()
    }

    /// Overlap of two ranges
    ///
    /// Returns `None` when the overlap is empty (including ranges which only
    /// touch).
    pub fn intersection(self, other: Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Range { start, end })
    }

    /// Smallest range covering both
    pub fn union(self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Translate by `delta` code units
    #[inline]
    pub fn shifted(self, delta: usize) -> Range {
        let delta = to_u32(delta);
        Range {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Convert to a standard library range
    #[inline]
    pub fn to_std(self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(range: std::ops::Range<usize>) -> Range {
        Range::new(range.start, range.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    #[inline]
    fn from(range: Range) -> std::ops::Range<usize> {
        range.to_std()
    }
}
