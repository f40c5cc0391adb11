// src/lib.rs
//! markpress turns loosely structured markup into a paginated, styled PDF.
//!
//! The input convention is small: lines starting with `##` open a section,
//! `**bold**`, `*italic*` and `[label](https://...)` mark up inline text,
//! and a body whose first non-blank line carries a bullet marker (`- `,
//! `1.`, `a.`) renders as a bullet list. Everything else flows as
//! paragraphs. Styling (page size, margins, fonts, colors, spacing) comes
//! from a [`StyleConfig`], overridable from JSON.
//!
//! ```no_run
//! use markpress::{Composer, StyleConfig};
//!
//! let composer = Composer::new(StyleConfig::default());
//! let doc = composer.compose("## Hello\nSome **bold** text.", "greeting")?;
//! std::fs::write("greeting.pdf", doc.as_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod doc;
pub mod error;
pub mod layout;
pub mod markup;
pub mod render;
pub mod style;

pub use doc::{ContentBlock, InlineSpan, RenderedDocument, RichText, Section};
pub use error::ComposeError;
pub use render::RenderError;
pub use style::{BuiltinFamily, Color, FontSpec, Margins, PageLayout, PageSize, StyleConfig};

use layout::{LayoutEngine, paginate};
use render::{FontCatalog, PdfRenderer};

/// The pipeline front door: holds a style configuration and composes any
/// number of documents with it.
pub struct Composer {
    style: StyleConfig,
}

impl Composer {
    pub fn new(style: StyleConfig) -> Self {
        Composer { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Run the full pipeline: parse `raw`, lay the sections out, render
    /// the PDF. `label` becomes the document title in the PDF metadata.
    ///
    /// Parsing is total; failure means the configured font could not be
    /// resolved or PDF emission broke.
    pub fn compose(&self, raw: &str, label: &str) -> Result<RenderedDocument, ComposeError> {
        let sections = markup::parse(raw);
        let fonts = FontCatalog::load(&self.style.font)?;
        let flow = LayoutEngine::new(&self.style, &fonts).build_flow(&sections);
        let layout = paginate(&self.style, flow);
        let page_count = layout.pages.len();
        let bytes = PdfRenderer::new(&self.style, &fonts).render(&layout, label)?;
        log::debug!(
            "composed '{}': {} section(s), {} page(s), {} bytes",
            label,
            sections.len(),
            page_count,
            bytes.len()
        );
        Ok(RenderedDocument::new(bytes, page_count))
    }
}

impl Default for Composer {
    fn default() -> Self {
        Composer::new(StyleConfig::default())
    }
}
