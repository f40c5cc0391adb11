use lopdf::Document as LopdfDocument;
use markpress::{Composer, ComposeError, RenderedDocument, StyleConfig};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with inspection helpers.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub page_count: usize,
}

impl GeneratedPdf {
    pub fn from_document(rendered: RenderedDocument) -> Result<Self, Box<dyn std::error::Error>> {
        let page_count = rendered.page_count();
        let bytes = rendered.into_bytes();
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self {
            bytes,
            doc,
            page_count,
        })
    }

    /// Text of one page, 1-based like lopdf's page numbering.
    pub fn page_text(&self, page_num: u32) -> String {
        self.doc.extract_text(&[page_num]).unwrap_or_default()
    }

    /// Concatenated text of every page, in page order.
    pub fn all_text(&self) -> String {
        let mut text = String::new();
        for page_num in 1..=self.doc.get_pages().len() {
            text.push_str(&self.page_text(page_num as u32));
            text.push('\n');
        }
        text
    }
}

/// Compose `raw` with the default style.
pub fn compose(raw: &str, label: &str) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    compose_styled(raw, label, StyleConfig::default())
}

pub fn compose_styled(
    raw: &str,
    label: &str,
    style: StyleConfig,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    init_logging();
    let rendered = Composer::new(style).compose(raw, label)?;
    GeneratedPdf::from_document(rendered)
}

/// Compose expecting a pipeline failure.
pub fn compose_err(raw: &str, style: StyleConfig) -> ComposeError {
    init_logging();
    match Composer::new(style).compose(raw, "should-fail") {
        Err(e) => e,
        Ok(_) => panic!("compose unexpectedly succeeded"),
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
