// src/render/pdf.rs
//! Turns positioned pages into PDF objects: content streams, link
//! annotations, the document outline and the info dictionary.

use crate::layout::elements::{FontVariant, HeadingAnchor, Page, PositionedElement};
use crate::layout::page::LayoutResult;
use crate::render::fonts::{FontCatalog, encode_win_ansi, encode_win_ansi_lossy};
use crate::render::writer::DocWriter;
use crate::render::RenderError;
use crate::style::{Color, StyleConfig};
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, Stream, StringFormat, dictionary};

/// Fraction of the font size from the line top down to the baseline.
const BASELINE_RATIO: f32 = 0.8;

pub(crate) struct PdfRenderer<'a> {
    style: &'a StyleConfig,
    fonts: &'a FontCatalog,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(style: &'a StyleConfig, fonts: &'a FontCatalog) -> Self {
        PdfRenderer { style, fonts }
    }

    /// Serialize the layout into a complete PDF. `title` lands in the
    /// document info dictionary.
    pub fn render(&self, layout: &LayoutResult, title: &str) -> Result<Vec<u8>, RenderError> {
        let (page_width, page_height) = self.style.page.size.dimensions_pt();
        let mut writer = DocWriter::new();

        let font_dict = self.fonts.build_resource_dict(&mut writer);
        writer.put(
            writer.resources_id,
            dictionary! { "Font" => font_dict }.into(),
        );

        // Page ids are reserved up front so annotations and outlines can
        // reference any page before its dictionary exists.
        let page_ids: Vec<ObjectId> = layout.pages.iter().map(|_| writer.reserve()).collect();

        for (page, &page_id) in layout.pages.iter().zip(&page_ids) {
            let content = build_content(page, page_height);
            let bytes = content
                .encode()
                .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = writer.add(Object::Stream(Stream::new(dictionary! {}, bytes)));

            let annots = build_link_annotations(page, page_height, &mut writer);
            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => writer.resources_id,
            };
            if !annots.is_empty() {
                page_dict.set(
                    "Annots",
                    annots
                        .iter()
                        .map(|id| Object::Reference(*id))
                        .collect::<Vec<Object>>(),
                );
            }
            writer.put(page_id, page_dict.into());
        }

        let outline_root_id = build_outlines(&layout.anchors, &page_ids, page_height, &mut writer);
        let info_id = writer.add(
            dictionary! {
                "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
                "Producer" => Object::String(b"markpress".to_vec(), StringFormat::Literal),
            }
            .into(),
        );

        writer
            .finish(page_ids, outline_root_id, Some(info_id))
            .map_err(RenderError::Io)
    }
}

/// Text-state values the content stream carries between text objects.
#[derive(Default)]
struct GraphicsState {
    font: Option<(FontVariant, u32)>,
    color: Option<Color>,
}

fn build_content(page: &Page, page_height: f32) -> Content {
    let mut ops: Vec<Operation> = Vec::new();
    let mut state = GraphicsState::default();

    for el in page {
        if el.run.content.trim().is_empty() {
            continue;
        }
        ops.push(Operation::new("BT", vec![]));
        let font_key = (el.run.variant, el.run.font_size.to_bits());
        if state.font != Some(font_key) {
            ops.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(FontCatalog::resource_name(el.run.variant).into()),
                    el.run.font_size.into(),
                ],
            ));
            state.font = Some(font_key);
        }
        if state.color != Some(el.run.color) {
            let c = el.run.color;
            ops.push(Operation::new(
                "rg",
                vec![
                    (c.r as f32 / 255.0).into(),
                    (c.g as f32 / 255.0).into(),
                    (c.b as f32 / 255.0).into(),
                ],
            ));
            state.color = Some(c);
        }
        let baseline = el.y + el.run.font_size * BASELINE_RATIO;
        ops.push(Operation::new(
            "Td",
            vec![el.x.into(), (page_height - baseline).into()],
        ));
        let (bytes, replaced) = encode_win_ansi_lossy(&el.run.content);
        if replaced > 0 {
            log::warn!(
                "{} character(s) outside WinAnsi replaced with '?' in {:?}",
                replaced,
                el.run.content
            );
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(bytes, StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    Content { operations: ops }
}

fn build_link_annotations(
    page: &Page,
    page_height: f32,
    writer: &mut DocWriter,
) -> Vec<ObjectId> {
    page.iter()
        .filter_map(|el| el.run.href.as_deref().map(|href| (el, href)))
        .map(|(el, href)| link_annotation(el, href, page_height, writer))
        .collect()
}

fn link_annotation(
    el: &PositionedElement,
    href: &str,
    page_height: f32,
    writer: &mut DocWriter,
) -> ObjectId {
    let action = dictionary! {
        "Type" => "Action",
        "S" => "URI",
        "URI" => Object::String(href.as_bytes().to_vec(), StringFormat::Literal),
    };
    let action_id = writer.add(action.into());
    let rect = vec![
        el.x.into(),
        (page_height - (el.y + el.height)).into(),
        (el.x + el.width).into(),
        (page_height - el.y).into(),
    ];
    writer.add(
        dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => rect,
            "Border" => vec![0.into(), 0.into(), 0.into()],
            "A" => action_id,
        }
        .into(),
    )
}

/// Build a flat document outline with one entry per heading anchor.
fn build_outlines(
    anchors: &[HeadingAnchor],
    page_ids: &[ObjectId],
    page_height: f32,
    writer: &mut DocWriter,
) -> Option<ObjectId> {
    let anchors: Vec<&HeadingAnchor> = anchors
        .iter()
        .filter(|a| a.page_index < page_ids.len())
        .collect();
    if anchors.is_empty() {
        return None;
    }

    let item_ids: Vec<ObjectId> = anchors.iter().map(|_| writer.reserve()).collect();
    let root_id = writer.reserve();

    for (i, anchor) in anchors.iter().enumerate() {
        let dest = vec![
            Object::Reference(page_ids[anchor.page_index]),
            "FitH".into(),
            (page_height - anchor.y).into(),
        ];
        let mut dict = dictionary! {
            "Title" => Object::String(encode_win_ansi(&anchor.title), StringFormat::Literal),
            "Parent" => root_id,
            "Dest" => dest,
        };
        if i > 0 {
            dict.set("Prev", item_ids[i - 1]);
        }
        if i < item_ids.len() - 1 {
            dict.set("Next", item_ids[i + 1]);
        }
        writer.put(item_ids[i], dict.into());
    }

    writer.put(
        root_id,
        dictionary! {
            "Type" => "Outlines",
            "First" => item_ids[0],
            "Last" => item_ids[item_ids.len() - 1],
            "Count" => item_ids.len() as i64,
        }
        .into(),
    );
    Some(root_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::elements::TextRun;
    use crate::style::FontSpec;

    fn element(text: &str, y: f32, href: Option<&str>) -> PositionedElement {
        PositionedElement {
            x: 40.0,
            y,
            width: 100.0,
            height: 16.0,
            run: TextRun {
                content: text.to_string(),
                variant: FontVariant::Regular,
                font_size: 12.0,
                color: Color::BLACK,
                href: href.map(str::to_string),
            },
        }
    }

    fn render(layout: &LayoutResult) -> lopdf::Document {
        let style = StyleConfig::default();
        let fonts = FontCatalog::load(&FontSpec::default()).unwrap();
        let bytes = PdfRenderer::new(&style, &fonts)
            .render(layout, "test")
            .unwrap();
        lopdf::Document::load_mem(&bytes).expect("generated PDF should parse")
    }

    #[test]
    fn renders_one_pdf_page_per_layout_page() {
        let layout = LayoutResult {
            pages: vec![vec![element("one", 40.0, None)], vec![element("two", 40.0, None)]],
            anchors: vec![],
        };
        let doc = render(&layout);
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn page_text_survives_extraction() {
        let layout = LayoutResult {
            pages: vec![vec![element("hello renderer", 40.0, None)]],
            anchors: vec![],
        };
        let doc = render(&layout);
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("hello renderer"), "extracted: {text:?}");
    }

    #[test]
    fn link_runs_become_uri_annotations() {
        let layout = LayoutResult {
            pages: vec![vec![element("site", 40.0, Some("https://example.com"))]],
            anchors: vec![],
        };
        let doc = render(&layout);
        let page_id = doc.get_pages()[&1];
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let annots = page.get(b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 1);
        let annot = doc
            .get_object(annots[0].as_reference().unwrap())
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(annot.get(b"Subtype").unwrap().as_name().unwrap(), b"Link");
        let action = doc
            .get_object(annot.get(b"A").unwrap().as_reference().unwrap())
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(
            action.get(b"URI").unwrap().as_str().unwrap(),
            b"https://example.com"
        );
    }

    #[test]
    fn anchors_become_a_flat_outline() {
        let layout = LayoutResult {
            pages: vec![vec![element("One", 40.0, None)], vec![element("Two", 40.0, None)]],
            anchors: vec![
                HeadingAnchor {
                    page_index: 0,
                    y: 40.0,
                    title: "One".to_string(),
                },
                HeadingAnchor {
                    page_index: 1,
                    y: 40.0,
                    title: "Two".to_string(),
                },
            ],
        };
        let doc = render(&layout);
        let catalog = doc.catalog().unwrap();
        let root_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let root = doc.get_object(root_id).unwrap().as_dict().unwrap();
        assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), 2);
        let first = doc
            .get_object(root.get(b"First").unwrap().as_reference().unwrap())
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(first.get(b"Title").unwrap().as_str().unwrap(), b"One");
        let dest = first.get(b"Dest").unwrap().as_array().unwrap();
        assert_eq!(dest[1].as_name().unwrap(), b"FitH");
        assert!(first.get(b"Next").is_ok());
    }

    #[test]
    fn empty_layout_renders_a_blank_single_page() {
        let layout = LayoutResult {
            pages: vec![vec![]],
            anchors: vec![],
        };
        let doc = render(&layout);
        assert_eq!(doc.get_pages().len(), 1);
        let catalog = doc.catalog().unwrap();
        assert!(catalog.get(b"Outlines").is_err());
    }

    #[test]
    fn info_title_is_recorded() {
        let layout = LayoutResult {
            pages: vec![vec![]],
            anchors: vec![],
        };
        let doc = render(&layout);
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"test");
    }
}
