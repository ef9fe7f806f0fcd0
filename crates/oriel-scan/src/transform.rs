//! Document transform pass.
//!
//! Runs after the tagged HTML is live in the document: finds every marked
//! code block in document order, captures its snippet, inserts a lazy
//! preview right after it and hides (never removes) the original. A block
//! with nothing to capture is skipped with a diagnostic; the rest of the
//! page still transforms.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use oriel_dom::{Document, NodeId, Page};
use oriel_preview::{LazyCodePreview, PreviewConfig, SharedSurface};

/// Counts from one transform pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Blocks turned into previews this pass.
    pub transformed: usize,
    /// Marked blocks skipped as malformed.
    pub skipped: usize,
}

/// Capture the snippet text of a tagged container.
///
/// Contract: the first text-bearing child wins - an element child yields
/// its full text content (the usual `<pre><code>…</code></pre>` shape), a
/// bare text child yields itself. Whitespace and newlines come through
/// exactly; `None` means the block has nothing to capture.
pub fn extract_snippet(doc: &Document, container: NodeId) -> Option<String> {
    for &child in doc.children(container) {
        if doc.is_element(child) {
            return Some(doc.text_content(child));
        }
        if let Some(text) = doc.text(child) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Transform every marked, not-yet-processed block on the page.
///
/// `processed` tracks block identity across invocations so a double-fired
/// completion hook cannot transform a block twice; the hidden-state check
/// backstops a host that re-fires after that set is gone. Previews are
/// pushed into `previews`, which keeps them alive for the page's lifetime.
pub fn transform_page(
    page: &mut Page,
    surface: &SharedSurface,
    config: &PreviewConfig,
    marker_class: &str,
    processed: &Rc<RefCell<HashSet<NodeId>>>,
    previews: &Rc<RefCell<Vec<LazyCodePreview>>>,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let blocks: Vec<NodeId> = page
        .doc
        .elements_by_class(marker_class)
        .into_iter()
        .filter(|&block| page.doc.tag(block) == Some("pre"))
        .collect();

    for block in blocks {
        if processed.borrow().contains(&block) || page.doc.is_hidden(block) {
            continue;
        }

        let Some(snippet) = extract_snippet(&page.doc, block) else {
            tracing::warn!(block = %block, "marked block has no code to capture; skipping");
            outcome.skipped += 1;
            continue;
        };

        let preview =
            LazyCodePreview::new(page, Rc::clone(surface), config.clone(), snippet);
        if let Err(err) = page.doc.insert_after(block, preview.node()) {
            tracing::warn!(block = %block, %err, "could not place preview; skipping");
            outcome.skipped += 1;
            continue;
        }
        page.doc.set_hidden(block, true);

        processed.borrow_mut().insert(block);
        previews.borrow_mut().push(preview);
        outcome.transformed += 1;
    }

    if outcome.transformed > 0 || outcome.skipped > 0 {
        tracing::debug!(
            transformed = outcome.transformed,
            skipped = outcome.skipped,
            "transform pass complete"
        );
    }

    outcome
}
