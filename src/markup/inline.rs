// src/markup/inline.rs
//! Inline-span resolution: `**bold**`, `*italic*` and `[text](url)` markers
//! become flat [`InlineSpan`]s.
//!
//! Resolution is sequential substitution over a span list, in fixed
//! precedence: bold, then italic (on the already-bold-substituted spans, so
//! a consumed `**` pair is never re-matched as two single `*`), then links.
//! Anything that does not match passes through as literal text; resolution
//! is total and never fails.

use crate::doc::{InlineSpan, RichText, merge_spans};
use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
// The scheme is mandatory; `[text](notaurl)` stays literal.
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.+?)\]\((https?://[^)]+)\)").unwrap());

/// Resolve the three documented inline patterns over one line of text.
pub fn resolve_spans(line: &str) -> RichText {
    let spans = vec![InlineSpan::plain(line)];
    let spans = substitute(spans, &BOLD, |span, caps| {
        span.text = caps[1].to_string();
        span.bold = true;
    });
    let spans = substitute(spans, &ITALIC, |span, caps| {
        span.text = caps[1].to_string();
        span.italic = true;
    });
    let spans = substitute(spans, &LINK, |span, caps| {
        span.text = caps[1].to_string();
        span.link = Some(caps[2].to_string());
    });
    merge_spans(spans)
}

/// One substitution pass: each match inside a span splits it, with the
/// matched region rewritten by `mark` (attributes already present on the
/// span are inherited by all pieces).
fn substitute(
    spans: RichText,
    pattern: &Regex,
    mark: impl Fn(&mut InlineSpan, &regex::Captures),
) -> RichText {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let mut cursor = 0;
        for caps in pattern.captures_iter(&span.text) {
            let whole = caps.get(0).expect("match has a whole-match group");
            if whole.start() > cursor {
                out.push(InlineSpan {
                    text: span.text[cursor..whole.start()].to_string(),
                    ..span.clone()
                });
            }
            let mut marked = span.clone();
            mark(&mut marked, &caps);
            out.push(marked);
            cursor = whole.end();
        }
        if cursor < span.text.len() {
            out.push(InlineSpan {
                text: span.text[cursor..].to_string(),
                ..span
            });
        }
    }
    out
}
