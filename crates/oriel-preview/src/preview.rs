//! Lazily-activated code previews.
//!
//! A preview renders an empty placeholder and waits. When the placeholder
//! becomes sufficiently visible it claims the shared surface, then after a
//! short settle delay redirects it to this snippet's encoded URL. Another
//! preview activating simply steals the surface; the evicted preview is
//! not notified and its placeholder is left empty.

use std::cell::RefCell;
use std::rc::Rc;

use oriel_dom::{Document, NodeId, ObserverId, Page};
use oriel_view::{mount, rerender, View};

use crate::config::PreviewConfig;
use crate::encode::activation_url;
use crate::snippet::CodeSnippet;
use crate::surface::SharedSurface;

/// Where a preview is in its activation lifecycle.
///
/// `Activating` covers the settle window between claiming the surface and
/// issuing the redirect; a preview whose surface is stolen inside that
/// window returns to `Idle` without redirecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationPhase {
    Idle,
    Activating,
    Active,
}

struct PreviewState {
    snippet: CodeSnippet,
    placeholder: NodeId,
    surface: SharedSurface,
    config: PreviewConfig,
    phase: ActivationPhase,
    editor_unsupported: bool,
}

/// The preview's composed shell: the retained placeholder, plus a notice
/// region when embedded editing is unsupported.
struct PreviewShell {
    placeholder: NodeId,
    editor_unsupported: bool,
    edge: u32,
}

impl View for PreviewShell {
    fn name(&self) -> &'static str {
        "code-preview"
    }

    fn styles(&self) -> String {
        let edge = self.edge;
        format!(
            ".code-preview {{ position: relative; box-sizing: border-box; margin: 50px 0; \
width: 100%; display: flex; flex-direction: column; align-items: center; }} \
.code-preview .placeholder {{ width: 100%; height: {edge}px; display: flex; \
justify-content: center; align-items: center; }} \
.code-preview .editor-notice {{ background-color: black; color: white; \
font-size: 1.25em; width: 100%; max-width: {edge}px; }}"
        )
    }

    fn compose(&self, doc: &mut Document, root: NodeId) {
        if self.editor_unsupported {
            let notice = doc.create_element("div");
            doc.add_class(notice, "editor-notice");
            let text =
                doc.create_text("This example cannot be edited in the embedded editor.");
            let _ = doc.append_child(notice, text);
            let _ = doc.append_child(root, notice);
        }
        let _ = doc.append_child(root, self.placeholder);
    }
}

/// One documentation code block wrapped as a deferred live preview.
pub struct LazyCodePreview {
    state: Rc<RefCell<PreviewState>>,
    root: NodeId,
    observer: ObserverId,
}

impl LazyCodePreview {
    /// Wrap a snippet: mount the placeholder shell and register a
    /// visibility observer at the configured threshold.
    ///
    /// The returned node is detached; the caller inserts it where the
    /// preview should appear.
    pub fn new(
        page: &mut Page,
        surface: SharedSurface,
        config: PreviewConfig,
        snippet: impl Into<CodeSnippet>,
    ) -> Self {
        let placeholder = page.doc.create_element("div");
        page.doc.add_class(placeholder, "placeholder");

        let shell = PreviewShell {
            placeholder,
            editor_unsupported: false,
            edge: config.surface_edge,
        };
        let root = mount(&mut page.doc, &shell);

        let threshold = config.visibility_threshold;
        let state = Rc::new(RefCell::new(PreviewState {
            snippet: snippet.into(),
            placeholder,
            surface,
            config,
            phase: ActivationPhase::Idle,
            editor_unsupported: false,
        }));

        let observed = Rc::clone(&state);
        let observer = page.observe_visibility(placeholder, threshold, move |page, entry| {
            if entry.is_intersecting {
                activate(&observed, page);
            }
        });

        Self {
            state,
            root,
            observer,
        }
    }

    /// The preview's insertable root node.
    pub fn node(&self) -> NodeId {
        self.root
    }

    /// The placeholder the surface lands in on activation.
    pub fn placeholder(&self) -> NodeId {
        self.state.borrow().placeholder
    }

    /// Current activation phase.
    pub fn phase(&self) -> ActivationPhase {
        self.state.borrow().phase
    }

    /// The stored snippet, exactly as captured. Accessor only.
    pub fn last_code(&self) -> CodeSnippet {
        self.state.borrow().snippet.clone()
    }

    /// Flag embedded editing as unsupported and re-render so a notice
    /// region appears alongside the preview.
    pub fn mark_editor_unsupported(&self, doc: &mut Document) {
        let shell = {
            let mut state = self.state.borrow_mut();
            state.editor_unsupported = true;
            PreviewShell {
                placeholder: state.placeholder,
                editor_unsupported: state.editor_unsupported,
                edge: state.config.surface_edge,
            }
        };
        rerender(doc, self.root, &shell);
    }

    /// Stop observing visibility. Not needed in the scanned-page flow,
    /// where abandoned observers go quiet on their own.
    pub fn release(&self, page: &mut Page) {
        page.unobserve(self.observer);
    }
}

/// Claim the surface for this preview and schedule the deferred redirect.
fn activate(state: &Rc<RefCell<PreviewState>>, page: &mut Page) {
    let (surface, placeholder, delay) = {
        let state = state.borrow();
        (
            Rc::clone(&state.surface),
            state.placeholder,
            state.config.settle_delay_ms,
        )
    };

    let handle = surface.borrow().handle();
    if let Err(err) = page.doc.append_child(placeholder, handle) {
        tracing::warn!(%err, "preview could not claim the shared surface");
        return;
    }
    state.borrow_mut().phase = ActivationPhase::Activating;
    tracing::debug!("preview claimed the shared surface");

    let deferred = Rc::clone(state);
    page.schedule_after(delay, move |page| {
        let (surface, placeholder) = {
            let state = deferred.borrow();
            (Rc::clone(&state.surface), state.placeholder)
        };

        // The delay is not cancellable; if another preview stole the
        // surface in the meantime, the last activation wins and this
        // redirect is dropped.
        let handle = surface.borrow().handle();
        if page.doc.parent(handle) != Some(placeholder) {
            tracing::debug!("surface was stolen during settle; dropping redirect");
            deferred.borrow_mut().phase = ActivationPhase::Idle;
            return;
        }

        let url = {
            let state = deferred.borrow();
            activation_url(&state.config.tool_base_url, state.snippet.as_str())
        };
        surface.borrow_mut().redirect(&mut page.doc, &url);
        deferred.borrow_mut().phase = ActivationPhase::Active;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use oriel_dom::Rect;
    use pretty_assertions::assert_eq;

    use crate::surface::SharedPreviewSurface;

    const VIEW: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    struct Fixture {
        page: Page,
        surface: SharedSurface,
    }

    impl Fixture {
        fn new() -> Self {
            let mut page = Page::new(VIEW);
            let surface = SharedPreviewSurface::new(&mut page.doc, &PreviewConfig::default());
            Self { page, surface }
        }

        /// Mount a preview at a vertical offset, placeholder laid out.
        fn preview_at(&mut self, y: f64, code: &str) -> LazyCodePreview {
            let preview = LazyCodePreview::new(
                &mut self.page,
                Rc::clone(&self.surface),
                PreviewConfig::default(),
                code,
            );
            let root = self.page.doc.root();
            self.page.doc.append_child(root, preview.node()).unwrap();
            self.page
                .set_layout(preview.placeholder(), Rect::new(0.0, y, 800.0, 512.0));
            preview
        }
    }

    #[test]
    fn activates_when_sufficiently_visible() {
        let mut fx = Fixture::new();
        let preview = fx.preview_at(1000.0, "osc(10,0.1,1).out()");

        fx.page.scroll_to(1000.0);
        assert_eq!(preview.phase(), ActivationPhase::Activating);

        fx.page.run_until_idle();

        assert_eq!(preview.phase(), ActivationPhase::Active);
        assert_eq!(
            fx.page.doc.parent(fx.surface.borrow().handle()),
            Some(preview.placeholder())
        );
        assert_eq!(
            fx.surface.borrow().current_url(),
            activation_url("https://hydra.ojack.xyz/", "osc(10,0.1,1).out()")
        );
    }

    #[test]
    fn never_visible_means_never_activated() {
        let mut fx = Fixture::new();
        let preview = fx.preview_at(5000.0, "noise(3).out()");

        // Scroll around without ever reaching the placeholder.
        fx.page.scroll_to(100.0);
        fx.page.scroll_to(900.0);
        fx.page.run_until_idle();

        assert_eq!(preview.phase(), ActivationPhase::Idle);
        assert_eq!(fx.page.doc.parent(fx.surface.borrow().handle()), None);
        assert_eq!(
            fx.surface.borrow().current_url(),
            "https://hydra.ojack.xyz/?code=JTIw"
        );
    }

    #[test]
    fn later_activation_evicts_the_earlier_holder() {
        let mut fx = Fixture::new();
        let first = fx.preview_at(1000.0, "shape(4).out()");
        let second = fx.preview_at(3000.0, "noise(3).out()");

        fx.page.scroll_to(1000.0);
        fx.page.run_until_idle();
        fx.page.scroll_to(3000.0);
        fx.page.run_until_idle();

        let handle = fx.surface.borrow().handle();
        assert_eq!(fx.page.doc.parent(handle), Some(second.placeholder()));
        assert!(fx.page.doc.children(first.placeholder()).is_empty());
        assert_eq!(
            fx.surface.borrow().current_url(),
            activation_url("https://hydra.ojack.xyz/", "noise(3).out()")
        );
    }

    #[test]
    fn stolen_surface_suppresses_the_stale_redirect() {
        let mut fx = Fixture::new();
        let first = fx.preview_at(1000.0, "shape(4).out()");
        let second = fx.preview_at(1600.0, "noise(3).out()");

        // Both become visible before either settle delay elapses.
        fx.page.scroll_to(1000.0);
        fx.page.scroll_to(1600.0);
        fx.page.run_until_idle();

        // The second activation won; the first preview's redirect was
        // dropped and it fell back to idle.
        assert_eq!(first.phase(), ActivationPhase::Idle);
        assert_eq!(second.phase(), ActivationPhase::Active);
        assert_eq!(
            fx.surface.borrow().current_url(),
            activation_url("https://hydra.ojack.xyz/", "noise(3).out()")
        );
    }

    #[test]
    fn unsupported_editor_renders_a_notice() {
        let mut fx = Fixture::new();
        let preview = fx.preview_at(1000.0, "osc(4).out()");

        preview.mark_editor_unsupported(&mut fx.page.doc);

        let children = fx.page.doc.children(preview.node()).to_vec();
        assert_eq!(children.len(), 2);
        assert!(fx.page.doc.has_class(children[0], "editor-notice"));
        // The retained placeholder is still there after the re-render.
        assert_eq!(children[1], preview.placeholder());
    }

    #[test]
    fn last_code_returns_the_captured_snippet() {
        let mut fx = Fixture::new();
        let preview = fx.preview_at(1000.0, "  osc(10)\n    .out()\n");

        assert_eq!(preview.last_code().as_str(), "  osc(10)\n    .out()\n");
    }
}
