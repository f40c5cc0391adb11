// src/markup/mod.rs
//! The markup parser: splits a raw text stream into ordered [`Section`]s.
//!
//! A heading line is one whose content, after leading whitespace, starts
//! with two or more `#` characters followed by heading text; the marker
//! alone opens no section. Text before the first heading is discarded by
//! policy. Each section body is classified once, from its
//! first non-blank line: a bullet marker (`1.`, `a.`, `A.` or `- `) makes
//! the whole body a bullet list, anything else a flowed paragraph. A marker
//! appearing later never reclassifies the block.
//!
//! Parsing is total: any input string yields a (possibly empty) section
//! sequence, never an error.

pub mod inline;

pub use inline::resolve_spans;

use crate::doc::{ContentBlock, RichText, Section};
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered (`1.`, `a.`, `A.`) or unordered (`- `) bullet marker at the
/// start of a line.
static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9A-Za-z]+\.\s+|-\s+)").unwrap());

/// Parse raw text into sections, in source order.
pub fn parse(raw: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in raw.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((heading, body)) = current.take() {
                sections.push(build_section(&heading, &body));
            }
            current = Some((heading.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line.to_string());
        }
        // Lines before the first heading fall through and are dropped.
    }
    if let Some((heading, body)) = current.take() {
        sections.push(build_section(&heading, &body));
    }

    log::debug!("parsed {} section(s)", sections.len());
    sections
}

/// The display text of a heading line, or `None` when the line is not one.
/// The marker alone is not a heading: `##` with nothing after it stays
/// body content.
fn heading_text(line: &str) -> Option<&str> {
    let content = line.trim_start();
    if !content.starts_with("##") {
        return None;
    }
    let heading = content.trim_start_matches('#').trim();
    (!heading.is_empty()).then_some(heading)
}

fn build_section(heading: &str, body: &[String]) -> Section {
    Section {
        heading: resolve_spans(heading),
        body: build_body(body),
    }
}

fn build_body(lines: &[String]) -> ContentBlock {
    let is_list = lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .is_some_and(|first| BULLET_MARKER.is_match(first));

    if is_list {
        let items: Vec<RichText> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| resolve_spans(BULLET_MARKER.replace(line, "").as_ref()))
            .collect();
        ContentBlock::BulletList(items)
    } else {
        // Flowed text: non-blank lines are span-resolved independently and
        // joined with single spaces.
        let mut text = RichText::new();
        for line in lines.iter().map(|line| line.trim()).filter(|l| !l.is_empty()) {
            if !text.is_empty() {
                if let Some(last) = text.last_mut() {
                    last.text.push(' ');
                }
            }
            text.extend(resolve_spans(line));
        }
        ContentBlock::Paragraph(text)
    }
}
