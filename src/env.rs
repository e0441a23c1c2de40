// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Rich-text environment: fonts, colours, limits and behaviour switches

use crate::{Align, Color, Font, Insets, Style};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Required action after an environment change
///
/// These are ordered by severity: each implies all less severe actions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Nothing to do
    #[default]
    None,
    /// The styled rendering must be rebuilt
    Render,
}

/// Environment in which rich text is rendered
///
/// An `Environment` can be default-constructed (no clamping, no limits).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Environment {
    /// Font of the text and of the default wrap markers
    pub font: Font,
    /// Colour of normal text
    pub text_color: Color,
    /// Colour of highlighted text and marker labels
    pub highlight_color: Color,
    /// Paragraph alignment
    pub align: Align,
    /// Additional space between lines
    pub line_spacing: f32,
    /// Insets of the text container within the view (editor only)
    pub insets: Insets,
    /// Horizontal padding of each line fragment (editor only)
    pub line_fragment_padding: f32,
    /// Number of lines shown before clamping with a marker
    ///
    /// Zero disables clamping.
    pub auto_wrap_line_count: usize,
    /// Maximum number of user-perceived characters; zero is unlimited
    pub text_limit_count: usize,
    /// Maximum number of lines an edit may produce; zero is unlimited
    pub text_limit_line: usize,
    /// Whether the user may insert line breaks
    pub allow_newline: bool,
    /// Whether taps are resolved
    pub tap_enabled: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            font: Font::default(),
            text_color: Color::BLACK,
            highlight_color: Color::BLUE,
            align: Align::default(),
            line_spacing: 0.0,
            insets: Insets::default(),
            line_fragment_padding: 0.0,
            auto_wrap_line_count: 0,
            text_limit_count: 0,
            text_limit_line: 0,
            allow_newline: true,
            tap_enabled: false,
        }
    }
}

impl Environment {
    /// Alternative default constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Style of normal text
    pub fn base_style(&self) -> Style {
        Style::new()
            .with_font(self.font.clone())
            .with_color(self.text_color)
            .with_align(self.align)
            .with_line_spacing(self.line_spacing)
    }

    /// Style applied over highlighted ranges
    pub fn highlight_style(&self) -> Style {
        Style::new().with_color(self.highlight_color)
    }

    /// Style of wrap marker labels
    pub fn marker_label_style(&self) -> Style {
        Style::new()
            .with_font(self.font.clone())
            .with_color(self.highlight_color)
    }
}

/// Helper to modify an environment
#[derive(Debug)]
pub struct UpdateEnv<'a> {
    env: &'a mut Environment,
    action: Action,
}

impl<'a> UpdateEnv<'a> {
    pub(crate) fn new(env: &'a mut Environment) -> Self {
        let action = Action::None;
        UpdateEnv { env, action }
    }

    pub(crate) fn finish(self) -> Action {
        self.action
    }

    /// Read access to the environment
    pub fn env(&self) -> &Environment {
        self.env
    }

    fn render(&mut self) {
        self.action = self.action.max(Action::Render);
    }

    /// Set the font
    pub fn set_font(&mut self, font: Font) {
        if font != self.env.font {
            self.env.font = font;
            self.render();
        }
    }

    /// Set the colour of normal text
    pub fn set_text_color(&mut self, color: Color) {
        if color != self.env.text_color {
            self.env.text_color = color;
            self.render();
        }
    }

    /// Set the colour of highlighted text
    pub fn set_highlight_color(&mut self, color: Color) {
        if color != self.env.highlight_color {
            self.env.highlight_color = color;
            self.render();
        }
    }

    /// Set the alignment
    pub fn set_align(&mut self, align: Align) {
        if align != self.env.align {
            self.env.align = align;
            self.render();
        }
    }

    /// Set the spacing between lines
    pub fn set_line_spacing(&mut self, spacing: f32) {
        if spacing != self.env.line_spacing {
            self.env.line_spacing = spacing;
            self.render();
        }
    }

    /// Set the text container insets
    pub fn set_insets(&mut self, insets: Insets) {
        if insets != self.env.insets {
            self.env.insets = insets;
            self.render();
        }
    }

    /// Set the line fragment padding
    pub fn set_line_fragment_padding(&mut self, padding: f32) {
        if padding != self.env.line_fragment_padding {
            self.env.line_fragment_padding = padding;
            self.render();
        }
    }

    /// Set the number of lines shown before clamping (0 to disable)
    pub fn set_auto_wrap_line_count(&mut self, count: usize) {
        if count != self.env.auto_wrap_line_count {
            self.env.auto_wrap_line_count = count;
            self.render();
        }
    }

    /// Set the character limit (0 for unlimited)
    ///
    /// Applies to subsequent edits only.
    pub fn set_text_limit_count(&mut self, count: usize) {
        self.env.text_limit_count = count;
    }

    /// Set the line limit of edits (0 for unlimited)
    pub fn set_text_limit_line(&mut self, count: usize) {
        self.env.text_limit_line = count;
    }

    /// Allow or deny insertion of line breaks
    pub fn set_allow_newline(&mut self, allow: bool) {
        self.env.allow_newline = allow;
    }

    /// Enable or disable tap resolution
    pub fn set_tap_enabled(&mut self, enabled: bool) {
        self.env.tap_enabled = enabled;
    }
}
