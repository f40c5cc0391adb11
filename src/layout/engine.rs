// src/layout/engine.rs
//! Flow construction: sections in, a linear stream of measured lines and
//! vertical gaps out. Pagination happens afterwards, so everything here is
//! page-agnostic and works purely against the content width.

use crate::doc::{ContentBlock, RichText, Section, plain_text};
use crate::layout::elements::{FontVariant, LineRun, TextRun};
use crate::render::FontCatalog;
use crate::style::{Color, StyleConfig, TextStyle};

/// One item of the pre-pagination stream. Lines are atomic: pagination
/// may move one to the next page but never splits it.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowItem {
    Line {
        runs: Vec<LineRun>,
        height: f32,
        /// Left offset from the content origin, added to each run's x.
        indent: f32,
        /// Set on the first line of a heading; becomes an outline entry.
        anchor: Option<String>,
    },
    Gap(f32),
}

const BULLET_MARKER: &str = "\u{2022}";

pub struct LayoutEngine<'a> {
    style: &'a StyleConfig,
    fonts: &'a FontCatalog,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(style: &'a StyleConfig, fonts: &'a FontCatalog) -> Self {
        LayoutEngine { style, fonts }
    }

    /// Lay every section out into a single flow, in document order.
    pub fn build_flow(&self, sections: &[Section]) -> Vec<FlowItem> {
        let mut flow = Vec::new();
        let content_width = self.style.page.content_width();

        for section in sections {
            flow.push(FlowItem::Gap(self.style.heading.space_before));
            self.push_heading(&mut flow, section, content_width);
            flow.push(FlowItem::Gap(
                self.style.heading.space_after + self.style.heading_to_body_space,
            ));
            self.push_body(&mut flow, &section.body, content_width);
            flow.push(FlowItem::Gap(self.style.section_space));
        }
        log::debug!(
            "built flow of {} items from {} sections",
            flow.len(),
            sections.len()
        );
        flow
    }

    fn push_heading(&self, flow: &mut Vec<FlowItem>, section: &Section, content_width: f32) {
        let style = &self.style.heading;
        let title = plain_text(&section.heading);
        // Headings always render in the bold face; inline italic still
        // applies on top.
        let lines = self.wrap(&section.heading, style, content_width, true);
        for (i, runs) in lines.into_iter().enumerate() {
            flow.push(FlowItem::Line {
                runs,
                height: style.leading,
                indent: 0.0,
                anchor: (i == 0).then(|| title.clone()),
            });
        }
    }

    fn push_body(&self, flow: &mut Vec<FlowItem>, body: &ContentBlock, content_width: f32) {
        match body {
            ContentBlock::Paragraph(text) => {
                if text.is_empty() {
                    return;
                }
                let style = &self.style.body;
                for runs in self.wrap(text, style, content_width, false) {
                    flow.push(FlowItem::Line {
                        runs,
                        height: style.leading,
                        indent: 0.0,
                        anchor: None,
                    });
                }
                flow.push(FlowItem::Gap(style.space_after));
            }
            ContentBlock::BulletList(items) => {
                let bullet = &self.style.bullet;
                let avail = content_width - bullet.indent;
                for item in items {
                    let lines = self.wrap(item, &bullet.text, avail, false);
                    for (i, mut runs) in lines.into_iter().enumerate() {
                        if i == 0 {
                            // The marker hangs left of the item indent.
                            runs.insert(0, self.marker_run(bullet.marker_indent - bullet.indent));
                        }
                        flow.push(FlowItem::Line {
                            runs,
                            height: bullet.text.leading,
                            indent: bullet.indent,
                            anchor: None,
                        });
                    }
                    flow.push(FlowItem::Gap(bullet.text.space_after));
                }
            }
        }
    }

    fn marker_run(&self, x: f32) -> LineRun {
        let style = &self.style.bullet.text;
        let width = self
            .fonts
            .measure(BULLET_MARKER, FontVariant::Regular, style.font_size);
        LineRun {
            x,
            width,
            run: TextRun {
                content: BULLET_MARKER.to_string(),
                variant: FontVariant::Regular,
                font_size: style.font_size,
                color: style.color,
                href: None,
            },
        }
    }

    /// Greedy word wrap of rich text into lines no wider than `avail`.
    /// Always yields at least one line, possibly empty. A single word
    /// wider than `avail` gets a line of its own rather than being cut.
    fn wrap(
        &self,
        text: &RichText,
        style: &TextStyle,
        avail: f32,
        force_bold: bool,
    ) -> Vec<Vec<LineRun>> {
        let mut builder = LineBuilder::new(self.fonts, avail);
        for span in text {
            let template = TextRun {
                content: String::new(),
                variant: FontVariant::from_flags(span.bold || force_bold, span.italic),
                font_size: style.font_size,
                color: if span.link.is_some() {
                    Color::LINK_BLUE
                } else {
                    style.color
                },
                href: span.link.clone(),
            };
            for word in span.text.split_inclusive(' ') {
                builder.push_word(word, &template);
            }
        }
        builder.finish()
    }
}

/// Accumulates words into width-constrained lines, splitting runs at line
/// boundaries while preserving their style.
struct LineBuilder<'a> {
    fonts: &'a FontCatalog,
    avail: f32,
    lines: Vec<Vec<LineRun>>,
    current: Vec<LineRun>,
    cursor: f32,
}

impl<'a> LineBuilder<'a> {
    fn new(fonts: &'a FontCatalog, avail: f32) -> Self {
        LineBuilder {
            fonts,
            avail,
            lines: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
        }
    }

    fn push_word(&mut self, word: &str, template: &TextRun) {
        let trimmed = word.trim_end_matches(' ');
        if self.cursor == 0.0 && trimmed.is_empty() {
            return;
        }
        let fit = self
            .fonts
            .measure(trimmed, template.variant, template.font_size);
        if self.cursor > 0.0 && self.cursor + fit > self.avail {
            self.break_line();
            if trimmed.is_empty() {
                return;
            }
        }
        let advance = self
            .fonts
            .measure(word, template.variant, template.font_size);
        match self.current.last_mut() {
            Some(last) if same_style(&last.run, template) => {
                last.run.content.push_str(word);
                last.width += advance;
            }
            _ => self.current.push(LineRun {
                x: self.cursor,
                width: advance,
                run: TextRun {
                    content: word.to_string(),
                    ..template.clone()
                },
            }),
        }
        self.cursor += advance;
    }

    fn break_line(&mut self) {
        self.trim_trailing();
        self.lines.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    /// Strip trailing spaces from the line's last run so they don't count
    /// against justified widths, dropping the run if nothing remains.
    fn trim_trailing(&mut self) {
        while let Some(last) = self.current.last_mut() {
            let trimmed = last.run.content.trim_end_matches(' ');
            if trimmed.len() == last.run.content.len() {
                break;
            }
            if trimmed.is_empty() {
                self.current.pop();
                continue;
            }
            last.run.content.truncate(trimmed.len());
            last.width = self
                .fonts
                .measure(&last.run.content, last.run.variant, last.run.font_size);
            break;
        }
    }

    fn finish(mut self) -> Vec<Vec<LineRun>> {
        self.trim_trailing();
        if !self.current.is_empty() || self.lines.is_empty() {
            self.lines.push(self.current);
        }
        self.lines
    }
}

fn same_style(a: &TextRun, b: &TextRun) -> bool {
    a.variant == b.variant && a.font_size == b.font_size && a.color == b.color && a.href == b.href
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::InlineSpan;
    use crate::style::FontSpec;

    fn engine_fixture() -> (StyleConfig, FontCatalog) {
        let style = StyleConfig::default();
        let fonts = FontCatalog::load(&FontSpec::default()).unwrap();
        (style, fonts)
    }

    fn section(heading: &str, body: ContentBlock) -> Section {
        Section {
            heading: vec![InlineSpan::plain(heading)],
            body,
        }
    }

    fn lines(flow: &[FlowItem]) -> Vec<&Vec<LineRun>> {
        flow.iter()
            .filter_map(|item| match item {
                FlowItem::Line { runs, .. } => Some(runs),
                FlowItem::Gap(_) => None,
            })
            .collect()
    }

    #[test]
    fn short_section_produces_expected_flow_shape() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let sections = vec![section(
            "Intro",
            ContentBlock::Paragraph(vec![InlineSpan::plain("hello world")]),
        )];
        let flow = engine.build_flow(&sections);

        // space_before, heading line, heading gap, body line, body gap,
        // section gap
        assert_eq!(flow.len(), 6);
        assert_eq!(flow[0], FlowItem::Gap(20.0));
        match &flow[1] {
            FlowItem::Line { anchor, height, .. } => {
                assert_eq!(anchor.as_deref(), Some("Intro"));
                assert_eq!(*height, 22.0);
            }
            other => panic!("expected heading line, got {other:?}"),
        }
        assert_eq!(flow[2], FlowItem::Gap(6.0 + 24.0));
        assert_eq!(flow[4], FlowItem::Gap(12.0));
        assert_eq!(flow[5], FlowItem::Gap(12.0));
    }

    #[test]
    fn headings_render_bold() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let sections = vec![section("Title", ContentBlock::Paragraph(vec![]))];
        let flow = engine.build_flow(&sections);
        let heading = lines(&flow)[0];
        assert_eq!(heading[0].run.variant, FontVariant::Bold);
        assert_eq!(heading[0].run.color, style.heading.color);
    }

    #[test]
    fn long_paragraph_wraps_at_content_width() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        // 40 ten-char words at 12pt with the 0.6em approximation is far
        // wider than the 532pt content width.
        let text = vec![InlineSpan::plain(
            std::iter::repeat("abcdefghij")
                .take(40)
                .collect::<Vec<_>>()
                .join(" "),
        )];
        let sections = vec![section("H", ContentBlock::Paragraph(text))];
        let flow = engine.build_flow(&sections);
        let body_lines = lines(&flow).len() - 1;
        assert!(body_lines > 1, "expected wrapping, got {body_lines} line(s)");
        // every committed line stays within the content width
        for line in lines(&flow) {
            if let Some(last) = line.last() {
                assert!(last.x + last.width <= style.page.content_width() + 0.01);
            }
        }
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let giant = "x".repeat(200);
        let text = vec![InlineSpan::plain(format!("a {giant} b"))];
        let sections = vec![section("H", ContentBlock::Paragraph(text))];
        let flow = engine.build_flow(&sections);
        let all = lines(&flow);
        // heading + three body lines: "a", the giant word, "b"
        assert_eq!(all.len(), 4);
        assert_eq!(all[2][0].run.content, giant);
    }

    #[test]
    fn link_spans_are_blue_and_carry_the_target() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let text = vec![
            InlineSpan::plain("see "),
            InlineSpan {
                text: "docs".to_string(),
                bold: false,
                italic: false,
                link: Some("https://example.com".to_string()),
            },
        ];
        let sections = vec![section("H", ContentBlock::Paragraph(text))];
        let flow = engine.build_flow(&sections);
        let body = lines(&flow)[1];
        let link = body
            .iter()
            .find(|r| r.run.href.is_some())
            .expect("no link run");
        assert_eq!(link.run.color, Color::LINK_BLUE);
        assert_eq!(link.run.href.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn bullet_items_get_a_hanging_marker() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let items = vec![
            vec![InlineSpan::plain("first")],
            vec![InlineSpan::plain("second")],
        ];
        let sections = vec![section("H", ContentBlock::BulletList(items))];
        let flow = engine.build_flow(&sections);
        let all = lines(&flow);
        for item_line in &all[1..] {
            let marker = &item_line[0];
            assert_eq!(marker.run.content, "\u{2022}");
            // marker_indent 10 relative to the 20pt item indent
            assert_eq!(marker.x, -10.0);
            assert_eq!(item_line[1].x, 0.0);
        }
    }

    #[test]
    fn adjacent_words_of_one_span_merge_into_one_run() {
        let (style, fonts) = engine_fixture();
        let engine = LayoutEngine::new(&style, &fonts);
        let text = vec![InlineSpan::plain("one two three")];
        let sections = vec![section("H", ContentBlock::Paragraph(text))];
        let flow = engine.build_flow(&sections);
        let body = lines(&flow)[1];
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].run.content, "one two three");
    }
}
