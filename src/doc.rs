// src/doc.rs
//! The in-memory representation of a document between parsing and layout:
//! ordered sections, each holding a heading and one typed content block.

/// A run of text carrying the resolved inline attributes.
///
/// Spans are flat and non-overlapping; nesting in the source markup
/// (`**a *b* c**`) collapses into adjacent spans with combined flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Absolute `http(s)` URL for hyperlink spans.
    pub link: Option<String>,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        InlineSpan {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when the span carries no formatting at all.
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && self.link.is_none()
    }

    fn same_attrs(&self, other: &InlineSpan) -> bool {
        self.bold == other.bold && self.italic == other.italic && self.link == other.link
    }
}

/// Resolved rich text: an ordered list of spans.
pub type RichText = Vec<InlineSpan>;

/// Concatenates adjacent spans with identical attributes and drops empty ones.
pub(crate) fn merge_spans(spans: RichText) -> RichText {
    let mut out: RichText = Vec::with_capacity(spans.len());
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.same_attrs(&span) => last.text.push_str(&span.text),
            _ => out.push(span),
        }
    }
    out
}

/// The display text of a rich run, formatting stripped. Used for outline
/// titles and logging.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// One parsed section: a heading and the body block under it.
///
/// Sections are immutable once parsed; the renderer consumes them read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: RichText,
    pub body: ContentBlock,
}

/// The typed body of a section, chosen once at parse time from the first
/// non-blank body line.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Flowed text. Empty when the section had no body.
    Paragraph(RichText),
    /// One entry per non-blank line, markers already stripped.
    BulletList(Vec<RichText>),
}

impl ContentBlock {
    pub fn is_empty(&self) -> bool {
        match self {
            ContentBlock::Paragraph(text) => text.is_empty(),
            ContentBlock::BulletList(items) => items.is_empty(),
        }
    }
}

/// The finished, paginated artifact: opaque PDF bytes plus the page count
/// as an optional diagnostic for hosts.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl RenderedDocument {
    pub(crate) fn new(bytes: Vec<u8>, page_count: usize) -> Self {
        RenderedDocument { bytes, page_count }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}
