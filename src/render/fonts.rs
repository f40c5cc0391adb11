// src/render/fonts.rs
//! Font resolution, WinAnsi encoding and text measurement.
//!
//! Two font sources exist. The builtin base-14 families (Helvetica, Times,
//! Courier) need no font file: viewers carry their glyphs and metrics, and
//! WinAnsi encoding covers the Latin script plus common symbols. Embedded
//! TrueType fonts are read from host-resolved paths, parsed for real
//! metrics and shipped inside the PDF as `FontFile2` streams.

use crate::layout::elements::FontVariant;
use crate::render::RenderError;
use crate::render::writer::DocWriter;
use crate::style::{BuiltinFamily, FontSpec};
use lopdf::{Dictionary, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Approximate advance per character, in em, for builtin fonts whose
/// metric tables we do not carry.
const BUILTIN_CHAR_WIDTH_EM: f32 = 0.6;

/// WinAnsi codes 0x80..0x9F that differ from Latin-1: typographic
/// punctuation, the bullet glyph and friends.
const WIN_ANSI_EXTRAS: &[(u8, char)] = &[
    (0x80, '\u{20AC}'), // €
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'), // …
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'), // '
    (0x92, '\u{2019}'), // '
    (0x93, '\u{201C}'), // "
    (0x94, '\u{201D}'), // "
    (0x95, '\u{2022}'), // •
    (0x96, '\u{2013}'), // –
    (0x97, '\u{2014}'), // —
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'), // ™
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

fn encode_char(c: char) -> Option<u8> {
    let cp = c as u32;
    match cp {
        0x00..=0x7F | 0xA0..=0xFF => Some(cp as u8),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(code, _)| *code),
    }
}

fn win_ansi_to_char(code: u8) -> Option<char> {
    match code {
        0x00..=0x7F | 0xA0..=0xFF => Some(code as char),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(b, _)| *b == code)
            .map(|(_, ch)| *ch),
    }
}

/// Encode text as WinAnsi bytes. Characters outside the encoding become
/// `?` rather than failing; hosts needing wider coverage must configure an
/// embedded font whose glyphs they control.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    encode_win_ansi_lossy(text).0
}

/// As [`encode_win_ansi`], also reporting how many characters degraded.
pub(crate) fn encode_win_ansi_lossy(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|c| {
            encode_char(c).unwrap_or_else(|| {
                replaced += 1;
                b'?'
            })
        })
        .collect();
    (bytes, replaced)
}

/// An embedded TrueType face with everything the PDF needs: the raw file,
/// per-code advances for the WinAnsi range and descriptor metrics, all in
/// 1000-per-em units.
struct EmbeddedFont {
    base_name: String,
    data: Vec<u8>,
    /// Advances for codes 32..=255.
    widths: Vec<f32>,
    missing_width: f32,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: [f32; 4],
}

impl EmbeddedFont {
    fn load(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path)
            .map_err(|_| RenderError::MissingResource(path.to_path_buf()))?;
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|_| RenderError::InvalidFont(path.to_path_buf()))?;

        let scale = 1000.0 / face.units_per_em() as f32;
        let advance = |c: char| -> f32 {
            face.glyph_index(c)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map(|units| units as f32 * scale)
                .unwrap_or(0.0)
        };
        let widths: Vec<f32> = (32u8..=255)
            .map(|code| win_ansi_to_char(code).map(&advance).unwrap_or(0.0))
            .collect();
        let missing_width = advance('?');

        let base_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string())
            .unwrap_or_else(|| fallback_name(path));
        let bbox = face.global_bounding_box();

        log::debug!("loaded font '{}' from {}", base_name, path.display());
        Ok(EmbeddedFont {
            base_name: sanitize_name(&base_name),
            ascent: face.ascender() as f32 * scale,
            descent: face.descender() as f32 * scale,
            cap_height: face.capital_height().unwrap_or(face.ascender()) as f32 * scale,
            bbox: [
                bbox.x_min as f32 * scale,
                bbox.y_min as f32 * scale,
                bbox.x_max as f32 * scale,
                bbox.y_max as f32 * scale,
            ],
            data,
            widths,
            missing_width,
        })
    }

    fn measure(&self, text: &str, font_size: f32) -> f32 {
        let per_mille: f32 = text
            .chars()
            .map(|c| match encode_char(c) {
                Some(code) if code >= 32 => self.widths[(code - 32) as usize],
                _ => self.missing_width,
            })
            .sum();
        per_mille * font_size / 1000.0
    }
}

fn fallback_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Embedded".to_string())
}

/// PDF names may not contain whitespace or delimiters.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect()
}

enum CatalogKind {
    Builtin(BuiltinFamily),
    /// One face per [`FontVariant`]; variants without their own file share
    /// the regular face.
    Embedded([Arc<EmbeddedFont>; 4]),
}

/// The resolved fonts for one render, addressed by [`FontVariant`].
pub struct FontCatalog {
    kind: CatalogKind,
}

impl FontCatalog {
    /// Resolve a [`FontSpec`], reading and parsing any configured font
    /// files. This is the render-time resource acquisition step: a path
    /// that cannot be read is [`RenderError::MissingResource`].
    pub fn load(spec: &FontSpec) -> Result<Self, RenderError> {
        let kind = match spec {
            FontSpec::Builtin(family) => CatalogKind::Builtin(*family),
            FontSpec::Embedded {
                regular,
                bold,
                italic,
                bold_italic,
            } => {
                let base = Arc::new(EmbeddedFont::load(regular)?);
                let variant = |path: &Option<PathBuf>| -> Result<Arc<EmbeddedFont>, RenderError> {
                    match path {
                        Some(path) => Ok(Arc::new(EmbeddedFont::load(path)?)),
                        None => Ok(Arc::clone(&base)),
                    }
                };
                CatalogKind::Embedded([
                    Arc::clone(&base),
                    variant(bold)?,
                    variant(italic)?,
                    variant(bold_italic)?,
                ])
            }
        };
        Ok(FontCatalog { kind })
    }

    /// The `/Font` resource name a variant is registered under.
    pub(crate) fn resource_name(variant: FontVariant) -> &'static str {
        ["F1", "F2", "F3", "F4"][variant.index()]
    }

    /// Measured width of `text` at `font_size`, in points. Builtin fonts
    /// use a flat per-character approximation; embedded fonts use their
    /// real advances.
    pub fn measure(&self, text: &str, variant: FontVariant, font_size: f32) -> f32 {
        match &self.kind {
            CatalogKind::Builtin(_) => {
                text.chars().count() as f32 * font_size * BUILTIN_CHAR_WIDTH_EM
            }
            CatalogKind::Embedded(faces) => faces[variant.index()].measure(text, font_size),
        }
    }

    /// Build the `/Font` dictionary for the page resources, adding any
    /// indirect objects (descriptors, font files) the embedded case needs.
    pub(crate) fn build_resource_dict(&self, writer: &mut DocWriter) -> Dictionary {
        let mut fonts = Dictionary::new();
        match &self.kind {
            CatalogKind::Builtin(family) => {
                for variant in FontVariant::ALL {
                    let dict = dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => builtin_base_name(*family, variant),
                        "Encoding" => "WinAnsiEncoding",
                    };
                    fonts.set(Self::resource_name(variant), Object::Dictionary(dict));
                }
            }
            CatalogKind::Embedded(faces) => {
                // Variants sharing a face share one font object.
                let mut registered: Vec<(*const EmbeddedFont, ObjectRef)> = Vec::new();
                for variant in FontVariant::ALL {
                    let face = &faces[variant.index()];
                    let key = Arc::as_ptr(face);
                    let id = match registered.iter().find(|(ptr, _)| *ptr == key) {
                        Some((_, id)) => *id,
                        None => {
                            let id = add_embedded_font(writer, face);
                            registered.push((key, id));
                            id
                        }
                    };
                    fonts.set(Self::resource_name(variant), Object::Reference(id));
                }
            }
        }
        fonts
    }
}

type ObjectRef = lopdf::ObjectId;

fn add_embedded_font(writer: &mut DocWriter, font: &EmbeddedFont) -> ObjectRef {
    let file_id = writer.add(Object::Stream(Stream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    )));
    let descriptor_id = writer.add(
        dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => font.base_name.clone(),
            "Flags" => 32i64,
            "FontBBox" => font.bbox.iter().map(|v| Object::Real(*v)).collect::<Vec<Object>>(),
            "ItalicAngle" => 0i64,
            "Ascent" => Object::Real(font.ascent),
            "Descent" => Object::Real(font.descent),
            "CapHeight" => Object::Real(font.cap_height),
            "StemV" => 80i64,
            "FontFile2" => file_id,
        }
        .into(),
    );
    writer.add(
        dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => font.base_name.clone(),
            "FirstChar" => 32i64,
            "LastChar" => 255i64,
            "Widths" => font.widths.iter().map(|w| Object::Integer(w.round() as i64)).collect::<Vec<Object>>(),
            "Encoding" => "WinAnsiEncoding",
            "FontDescriptor" => descriptor_id,
        }
        .into(),
    )
}

fn builtin_base_name(family: BuiltinFamily, variant: FontVariant) -> &'static str {
    use BuiltinFamily::*;
    use FontVariant::*;
    match (family, variant) {
        (Helvetica, Regular) => "Helvetica",
        (Helvetica, Bold) => "Helvetica-Bold",
        (Helvetica, Italic) => "Helvetica-Oblique",
        (Helvetica, BoldItalic) => "Helvetica-BoldOblique",
        (Times, Regular) => "Times-Roman",
        (Times, Bold) => "Times-Bold",
        (Times, Italic) => "Times-Italic",
        (Times, BoldItalic) => "Times-BoldItalic",
        (Courier, Regular) => "Courier",
        (Courier, Bold) => "Courier-Bold",
        (Courier, Italic) => "Courier-Oblique",
        (Courier, BoldItalic) => "Courier-BoldOblique",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_covers_latin_and_typographic_symbols() {
        assert_eq!(encode_win_ansi("Az9 ?"), b"Az9 ?".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("•"), vec![0x95]);
        assert_eq!(encode_win_ansi("—"), vec![0x97]);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
    }

    #[test]
    fn unencodable_chars_degrade_to_question_mark() {
        let (bytes, replaced) = encode_win_ansi_lossy("a₹b");
        assert_eq!(bytes, b"a?b".to_vec());
        assert_eq!(replaced, 1);
    }

    #[test]
    fn extras_round_trip() {
        for &(code, ch) in WIN_ANSI_EXTRAS {
            assert_eq!(encode_char(ch), Some(code));
            assert_eq!(win_ansi_to_char(code), Some(ch));
        }
    }

    #[test]
    fn builtin_measure_is_size_proportional() {
        let catalog = FontCatalog::load(&FontSpec::default()).unwrap();
        let narrow = catalog.measure("abcd", FontVariant::Regular, 10.0);
        let wide = catalog.measure("abcd", FontVariant::Regular, 20.0);
        assert!((narrow - 4.0 * 10.0 * BUILTIN_CHAR_WIDTH_EM).abs() < f32::EPSILON);
        assert!((wide - 2.0 * narrow).abs() < 0.001);
    }

    #[test]
    fn missing_font_file_is_missing_resource() {
        let spec = FontSpec::Embedded {
            regular: PathBuf::from("/definitely/not/here.ttf"),
            bold: None,
            italic: None,
            bold_italic: None,
        };
        match FontCatalog::load(&spec) {
            Err(RenderError::MissingResource(path)) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.ttf"));
            }
            Err(other) => panic!("expected MissingResource, got {other:?}"),
            Ok(_) => panic!("load unexpectedly succeeded"),
        }
    }

    #[test]
    fn builtin_variant_names() {
        assert_eq!(
            builtin_base_name(BuiltinFamily::Times, FontVariant::BoldItalic),
            "Times-BoldItalic"
        );
        assert_eq!(
            builtin_base_name(BuiltinFamily::Helvetica, FontVariant::Italic),
            "Helvetica-Oblique"
        );
    }

    #[test]
    fn name_sanitization() {
        assert_eq!(sanitize_name("DejaVu Sans"), "DejaVuSans");
        assert_eq!(sanitize_name("A/B(C)"), "ABC");
    }
}
