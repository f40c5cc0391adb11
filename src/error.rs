// src/error.rs
//! The crate-level error type.

use crate::render::RenderError;
use thiserror::Error;

/// Everything a compose call can fail with. Parsing never fails, so the
/// variants cover style configuration and rendering only.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("invalid style configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
