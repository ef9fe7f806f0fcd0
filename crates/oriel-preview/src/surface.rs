//! The shared preview surface.

use std::cell::RefCell;
use std::rc::Rc;

use oriel_dom::{Document, NodeId};
use oriel_view::{mount, View};

use crate::config::PreviewConfig;
use crate::encode::neutral_url;

/// Page-scoped handle to the one shared surface.
///
/// Constructed once at plugin install and injected into every preview;
/// whichever preview most recently inserted the handle owns the surface.
pub type SharedSurface = Rc<RefCell<SharedPreviewSurface>>;

/// The single expensive embeddable surface and its navigation state.
///
/// Owns one `iframe` node sized to a fixed square viewport. The node can
/// only sit under one parent at a time, so inserting [`handle`] into a new
/// container steals the surface from wherever it was.
///
/// [`handle`]: SharedPreviewSurface::handle
#[derive(Debug)]
pub struct SharedPreviewSurface {
    frame: NodeId,
    root: NodeId,
    current_url: String,
}

/// The surface's composed shell: a square wrapper holding the frame.
struct SurfaceShell {
    frame: NodeId,
    edge: u32,
}

impl View for SurfaceShell {
    fn name(&self) -> &'static str {
        "preview-surface"
    }

    fn styles(&self) -> String {
        let edge = self.edge;
        format!(
            ".preview-surface {{ width: {edge}px; height: {edge}px; position: relative; }}"
        )
    }

    fn compose(&self, doc: &mut Document, root: NodeId) {
        let _ = doc.append_child(root, self.frame);
    }
}

impl SharedPreviewSurface {
    /// Create the surface, sized per config and pointed at the neutral URL.
    ///
    /// Construction is infallible; the surface starts detached and enters
    /// the tree the first time a preview claims it.
    pub fn new(doc: &mut Document, config: &PreviewConfig) -> SharedSurface {
        let url = neutral_url(&config.tool_base_url);
        let frame = doc.create_element("iframe");
        doc.set_attr(frame, "width", &config.surface_edge.to_string());
        doc.set_attr(frame, "height", &config.surface_edge.to_string());
        doc.set_attr(frame, "src", &url);

        let shell = SurfaceShell {
            frame,
            edge: config.surface_edge,
        };
        let root = mount(doc, &shell);

        Rc::new(RefCell::new(Self {
            frame,
            root,
            current_url: url,
        }))
    }

    /// Navigate the embedded content to `url`, replacing the current
    /// navigation state (no history is kept). The content reloads entirely.
    pub fn redirect(&mut self, doc: &mut Document, url: &str) {
        doc.set_attr(self.frame, "src", url);
        self.current_url = url.to_string();
        tracing::debug!(url, "surface redirected");
    }

    /// The insertable root node. Appending it under a new container moves
    /// the surface there, evicting the previous holder.
    pub fn handle(&self) -> NodeId {
        self.root
    }

    /// The URL the surface currently targets.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }
}
