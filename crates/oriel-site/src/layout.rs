//! Naive block layout.
//!
//! Stacks the page's visible blocks vertically with fixed per-tag heights
//! so viewport intersection is meaningful in a headless document. Hidden
//! elements contribute nothing, which is what makes a transformed page lay
//! out as if the original blocks were gone.

use oriel_dom::{NodeId, Page, Rect};

/// Options for the stacking layout.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Width every block spans.
    pub content_width: f64,

    /// Vertical gap between stacked blocks.
    pub gap: f64,

    /// Height of a preview placeholder (the surface edge).
    pub placeholder_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            content_width: 800.0,
            gap: 16.0,
            placeholder_height: 512.0,
        }
    }
}

/// Lay out the subtree under `root`, replacing all previous layout.
pub fn layout_blocks(page: &mut Page, root: NodeId, options: &LayoutOptions) {
    page.clear_layout();
    let mut y = 0.0;
    stack(page, root, &mut y, options);
}

fn stack(page: &mut Page, node: NodeId, y: &mut f64, options: &LayoutOptions) {
    let children: Vec<NodeId> = page.doc.children(node).to_vec();
    for child in children {
        if !page.doc.is_element(child)
            || page.doc.is_hidden(child)
            || page.doc.tag(child) == Some("style")
        {
            continue;
        }

        if page.doc.has_class(child, "placeholder") {
            let rect = Rect::new(0.0, *y, options.content_width, options.placeholder_height);
            page.set_layout(child, rect);
            // Whatever sits inside the placeholder shares its box.
            let inner: Vec<NodeId> = page.doc.children(child).to_vec();
            for node in inner {
                if page.doc.is_element(node) {
                    page.set_layout(node, rect);
                }
            }
            *y += options.placeholder_height + options.gap;
            continue;
        }

        if let Some(height) = intrinsic_height(page.doc.tag(child)) {
            page.set_layout(child, Rect::new(0.0, *y, options.content_width, height));
            *y += height + options.gap;
        } else if page.doc.first_element_child(child).is_some() {
            // Container: stack its children, then span them.
            let start = *y;
            stack(page, child, y, options);
            let height = (*y - start - options.gap).max(0.0);
            page.set_layout(child, Rect::new(0.0, start, options.content_width, height));
        } else {
            // Text-only leaf without an intrinsic height.
            page.set_layout(child, Rect::new(0.0, *y, options.content_width, 24.0));
            *y += 24.0 + options.gap;
        }
    }
}

/// Fixed height for known block tags; `None` means "lay out as container".
fn intrinsic_height(tag: Option<&str>) -> Option<f64> {
    match tag? {
        "pre" => Some(120.0),
        "p" => Some(32.0),
        "h1" => Some(56.0),
        "h2" => Some(48.0),
        "h3" | "h4" | "h5" | "h6" => Some(40.0),
        "ul" | "ol" => Some(96.0),
        "blockquote" => Some(64.0),
        "table" => Some(128.0),
        "hr" => Some(8.0),
        _ => None,
    }
}
