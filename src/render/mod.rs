// src/render/mod.rs
//! PDF emission: font resolution, document assembly and page painting.

mod fonts;
mod pdf;
mod writer;

pub use fonts::{FontCatalog, encode_win_ansi};
pub(crate) use pdf::PdfRenderer;

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while producing the PDF artifact.
///
/// Resource-acquisition failures are fatal and abort rendering; no default
/// font substitution is attempted, to avoid silently mis-rendering text the
/// configured font was chosen for.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("font resource not found: {0}")]
    MissingResource(PathBuf),

    #[error("font resource is not a usable TrueType font: {0}")]
    InvalidFont(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF emission failed: {0}")]
    Pdf(String),
}
