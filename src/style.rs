// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Style attributes attachable to a range of text

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An sRGB colour with alpha
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    /// Construct an opaque colour
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Construct from `0xRRGGBB`
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Color::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Horizontal alignment of paragraph contents
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Align {
    /// Align to the start of the line (left for left-to-right text)
    #[default]
    Left,
    /// Align to centre
    Center,
    /// Align to the end of the line
    Right,
    /// Stretch to fill space
    ///
    /// For text, this is known as "justified alignment".
    Justified,
}

/// Font descriptor
///
/// The library never loads fonts: the descriptor is handed to the
/// [layout oracle](crate::layout::LayoutOracle) which interprets it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Font {
    /// Family name; `None` selects the host's system font
    pub family: Option<String>,
    /// Font size in points
    pub size: f32,
    /// Bold weight
    pub bold: bool,
}

impl Font {
    /// The system font at the given size
    pub fn system(size: f32) -> Self {
        Font {
            family: None,
            size,
            bold: false,
        }
    }

    /// A named family at the given size
    pub fn named(family: impl Into<String>, size: f32) -> Self {
        Font {
            family: Some(family.into()),
            size,
            bold: false,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::system(16.0)
    }
}

/// A bag of optional style attributes
///
/// Attributes which are `None` are not set by this style. Combining two
/// styles with [`Style::merged`] is the "additive" application: attributes
/// set by the later style win, others are inherited.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    pub font: Option<Font>,
    pub color: Option<Color>,
    pub align: Option<Align>,
    pub line_spacing: Option<f32>,
}

impl Style {
    /// A style setting nothing
    #[inline]
    pub fn new() -> Self {
        Style::default()
    }

    /// Set the font
    #[inline]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Set the foreground colour
    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the paragraph alignment
    #[inline]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set the additional spacing between lines
    #[inline]
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = Some(spacing);
        self
    }

    /// True if no attribute is set
    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.color.is_none()
            && self.align.is_none()
            && self.line_spacing.is_none()
    }

    /// Union of attributes, with those of `over` taking precedence
    pub fn merged(&self, over: &Style) -> Style {
        Style {
            font: over.font.clone().or_else(|| self.font.clone()),
            color: over.color.or(self.color),
            align: over.align.or(self.align),
            line_spacing: over.line_spacing.or(self.line_spacing),
        }
    }
}
