// src/layout/elements.rs
//! Geometry-bearing value types produced by layout and consumed by the
//! renderer.

use crate::style::Color;

/// The four faces a font family provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Italic,
        FontVariant::BoldItalic,
    ];

    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontVariant::Regular,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (true, true) => FontVariant::BoldItalic,
        }
    }

    pub fn index(self) -> usize {
        match self {
            FontVariant::Regular => 0,
            FontVariant::Bold => 1,
            FontVariant::Italic => 2,
            FontVariant::BoldItalic => 3,
        }
    }
}

/// A styled piece of text with no geometry yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub variant: FontVariant,
    pub font_size: f32,
    pub color: Color,
    /// Target URI when this run is a hyperlink.
    pub href: Option<String>,
}

/// A run placed on the line, x relative to the line's indent.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRun {
    pub x: f32,
    pub width: f32,
    pub run: TextRun,
}

/// A run with its final page position. Coordinates are top-left origin
/// in points; the renderer converts to PDF's bottom-left space.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub run: TextRun,
}

/// One laid-out page.
pub type Page = Vec<PositionedElement>;

/// A named destination recorded when a heading's first line lands.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingAnchor {
    pub page_index: usize,
    /// Top-origin y of the heading line on its page.
    pub y: f32,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_flags_round_trip() {
        assert_eq!(FontVariant::from_flags(false, false), FontVariant::Regular);
        assert_eq!(FontVariant::from_flags(true, true), FontVariant::BoldItalic);
        for (i, v) in FontVariant::ALL.iter().enumerate() {
            assert_eq!(v.index(), i);
        }
    }
}
