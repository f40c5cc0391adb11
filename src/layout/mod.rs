// src/layout/mod.rs
//! Turns parsed sections into positioned pages: [`engine`] builds a linear
//! flow of measured lines, [`page`] breaks that flow into pages.

pub mod elements;
pub mod engine;
pub mod page;

pub use elements::{FontVariant, HeadingAnchor, LineRun, Page, PositionedElement, TextRun};
pub use engine::{FlowItem, LayoutEngine};
pub use page::{LayoutResult, paginate};
