// src/layout/page.rs
//! Pagination: consume the flow stream and assign every line a page and
//! absolute position.

use crate::layout::elements::{HeadingAnchor, Page, PositionedElement};
use crate::layout::engine::FlowItem;
use crate::style::StyleConfig;

/// The finished layout: positioned pages plus the heading anchors the
/// renderer turns into outline entries.
#[derive(Debug, Default)]
pub struct LayoutResult {
    pub pages: Vec<Page>,
    pub anchors: Vec<HeadingAnchor>,
}

/// Flow the items onto pages top to bottom. Gaps that land at the top of
/// a fresh page are swallowed so no page starts with dead space; a gap
/// that overruns the bottom is consumed by the page break instead of
/// carrying over. Lines are atomic and move whole to the next page when
/// they do not fit; a line taller than the content area is placed anyway
/// rather than looping forever. Output always contains at least one page.
pub fn paginate(style: &StyleConfig, flow: Vec<FlowItem>) -> LayoutResult {
    let (_, page_height) = style.page.size.dimensions_pt();
    let top = style.page.margins.top;
    let bottom_limit = page_height - style.page.margins.bottom;
    let left = style.page.margins.left;

    let mut pages: Vec<Page> = Vec::new();
    let mut current: Page = Vec::new();
    let mut anchors = Vec::new();
    let mut y = top;

    for item in flow {
        match item {
            FlowItem::Gap(height) => {
                if y == top {
                    continue;
                }
                y += height;
                if y >= bottom_limit {
                    pages.push(std::mem::take(&mut current));
                    y = top;
                }
            }
            FlowItem::Line {
                runs,
                height,
                indent,
                anchor,
            } => {
                if y + height > bottom_limit && y > top {
                    pages.push(std::mem::take(&mut current));
                    y = top;
                }
                if let Some(title) = anchor {
                    anchors.push(HeadingAnchor {
                        page_index: pages.len(),
                        y,
                        title,
                    });
                }
                for line_run in runs {
                    current.push(PositionedElement {
                        x: left + indent + line_run.x,
                        y,
                        width: line_run.width,
                        height,
                        run: line_run.run,
                    });
                }
                y += height;
            }
        }
    }
    pages.push(current);

    log::debug!("paginated into {} page(s)", pages.len());
    LayoutResult { pages, anchors }
}
