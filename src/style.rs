// src/style.rs
//! Style configuration consumed by the layout engine and renderer.
//!
//! All values are plain data with serde support so hosts can override any
//! subset from JSON; nothing here is global state. The defaults reproduce
//! the composer's stock look: Letter pages with 40pt margins, colored
//! 18/22 headings, 12/16 body text and indented bullet items.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// An opaque RGB color.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// The fixed hyperlink color.
    pub const LINK_BLUE: Color = Color { r: 0, g: 0, b: 255 };

    /// Parse a `#RGB` or `#RRGGBB` hex string.
    fn parse_hex(s: &str) -> Result<Color, String> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color must start with '#', got: {s}"))?;
        let component = |part: &str| {
            u8::from_str_radix(part, 16).map_err(|e| format!("invalid color component: {e}"))
        };
        match hex.len() {
            3 => Ok(Color {
                r: component(&hex[0..1].repeat(2))?,
                g: component(&hex[1..2].repeat(2))?,
                b: component(&hex[2..3].repeat(2))?,
            }),
            6 => Ok(Color {
                r: component(&hex[0..2])?,
                g: component(&hex[2..4])?,
                b: component(&hex[4..6])?,
            }),
            n => Err(format!("invalid hex color length: expected 3 or 6, got {n}")),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Fixed page margins, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(40.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum PageSize {
    A4,
    #[default]
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl PageSize {
    /// Page dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub margins: Margins,
}

impl PageLayout {
    /// Width available for content between the horizontal margins.
    pub fn content_width(&self) -> f32 {
        let (width, _) = self.size.dimensions_pt();
        width - self.margins.left - self.margins.right
    }
}

/// Visual parameters for one class of text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    /// Vertical advance per line, in points.
    pub leading: f32,
    #[serde(default = "black")]
    pub color: Color,
    #[serde(default)]
    pub space_before: f32,
    #[serde(default)]
    pub space_after: f32,
}

fn black() -> Color {
    Color::BLACK
}

/// Bullet items share the body metrics but carry a distinct left indent for
/// the item text and a smaller one for the marker glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletStyle {
    #[serde(flatten)]
    pub text: TextStyle,
    pub indent: f32,
    pub marker_indent: f32,
}

/// Where glyphs come from.
///
/// The builtin base-14 families need no font file and cover the Latin
/// script plus common symbols through WinAnsi encoding. Hosts whose content
/// goes beyond that must point `Embedded` at a Unicode-capable TrueType
/// file; an unresolvable path is a fatal `MissingResource` error at render
/// time, never a silent substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSpec {
    Builtin(BuiltinFamily),
    Embedded {
        regular: PathBuf,
        #[serde(default)]
        bold: Option<PathBuf>,
        #[serde(default)]
        italic: Option<PathBuf>,
        #[serde(default)]
        bold_italic: Option<PathBuf>,
    },
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec::Builtin(BuiltinFamily::Helvetica)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltinFamily {
    Helvetica,
    Times,
    Courier,
}

/// The full style configuration for one compose call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub page: PageLayout,
    #[serde(default = "default_heading")]
    pub heading: TextStyle,
    #[serde(default = "default_body")]
    pub body: TextStyle,
    #[serde(default = "default_bullet")]
    pub bullet: BulletStyle,
    /// Vertical gap between a heading and its body.
    #[serde(default = "default_heading_to_body_space")]
    pub heading_to_body_space: f32,
    /// Vertical gap after each section's body.
    #[serde(default = "default_section_space")]
    pub section_space: f32,
    #[serde(default)]
    pub font: FontSpec,
}

fn default_heading() -> TextStyle {
    TextStyle {
        font_size: 18.0,
        leading: 22.0,
        color: Color {
            r: 0x4a,
            g: 0x90,
            b: 0xe2,
        },
        space_before: 20.0,
        space_after: 6.0,
    }
}

fn default_body() -> TextStyle {
    TextStyle {
        font_size: 12.0,
        leading: 16.0,
        color: Color::BLACK,
        space_before: 0.0,
        space_after: 12.0,
    }
}

fn default_bullet() -> BulletStyle {
    BulletStyle {
        text: TextStyle {
            space_after: 6.0,
            ..default_body()
        },
        indent: 20.0,
        marker_indent: 10.0,
    }
}

fn default_heading_to_body_space() -> f32 {
    24.0
}

fn default_section_space() -> f32 {
    12.0
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            page: PageLayout::default(),
            heading: default_heading(),
            body: default_body(),
            bullet: default_bullet(),
            heading_to_body_space: default_heading_to_body_space(),
            section_space: default_section_space(),
            font: FontSpec::default(),
        }
    }
}

impl StyleConfig {
    /// Load a configuration from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
