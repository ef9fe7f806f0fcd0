//! Minimal retained-node view components.
//!
//! A [`View`] composes a subtree under a root node it owns; re-rendering
//! detaches the root's children and composes again. Nodes a view retains
//! across renders (created once, re-parented in `compose`) survive
//! re-renders, which is what lets an observer registered on such a node
//! stay valid for the component's lifetime.
//!
//! Each view kind carries a name used as the root's class and as the key
//! for its scoped style block, which is injected into the document once.

use oriel_dom::{Document, NodeId};

/// A composable view component.
pub trait View {
    /// Stable kind name: the root's class and the style-block key.
    fn name(&self) -> &'static str;

    /// Scoped CSS for this view kind. Empty means no style block.
    fn styles(&self) -> String {
        String::new()
    }

    /// Build (or rebuild) the view's subtree under `root`.
    fn compose(&self, doc: &mut Document, root: NodeId);
}

/// Mount a view: create its root node, inject styles, compose.
///
/// The root is returned detached; the caller decides where it goes.
pub fn mount(doc: &mut Document, view: &dyn View) -> NodeId {
    ensure_styles(doc, view.name(), &view.styles());
    let root = doc.create_element("div");
    doc.add_class(root, view.name());
    view.compose(doc, root);
    root
}

/// Re-render a mounted view: drop the root's children and compose again.
///
/// Children are detached, not destroyed, so retained nodes the view
/// re-parents in `compose` keep their identity.
pub fn rerender(doc: &mut Document, root: NodeId, view: &dyn View) {
    doc.detach_children(root);
    view.compose(doc, root);
}

/// Inject a view kind's style block into the document, once.
fn ensure_styles(doc: &mut Document, name: &str, css: &str) {
    if css.is_empty() {
        return;
    }
    let root = doc.root();
    let already = doc
        .elements_by_tag("style")
        .iter()
        .any(|&s| doc.attr(s, "data-view") == Some(name));
    if already {
        return;
    }
    let style = doc.create_element("style");
    doc.set_attr(style, "data-view", name);
    let text = doc.create_text(css);
    let _ = doc.append_child(style, text);
    let _ = doc.append_child(root, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A view that re-parents one retained node and composes a label.
    struct Labeled {
        retained: NodeId,
        label: &'static str,
    }

    impl View for Labeled {
        fn name(&self) -> &'static str {
            "labeled"
        }

        fn styles(&self) -> String {
            ".labeled { display: flex; }".to_string()
        }

        fn compose(&self, doc: &mut Document, root: NodeId) {
            let _ = doc.append_child(root, self.retained);
            let label = doc.create_text(self.label);
            let _ = doc.append_child(root, label);
        }
    }

    #[test]
    fn mounts_detached_with_class() {
        let mut doc = Document::new();
        let retained = doc.create_element("span");
        let view = Labeled { retained, label: "one" };

        let root = mount(&mut doc, &view);

        assert_eq!(doc.parent(root), None);
        assert!(doc.has_class(root, "labeled"));
        assert_eq!(doc.text_content(root), "one");
    }

    #[test]
    fn rerender_keeps_retained_nodes() {
        let mut doc = Document::new();
        let retained = doc.create_element("span");
        let mut view = Labeled { retained, label: "one" };

        let root = mount(&mut doc, &view);
        view.label = "two";
        rerender(&mut doc, root, &view);

        assert_eq!(doc.parent(retained), Some(root));
        assert_eq!(doc.text_content(root), "two");
    }

    #[test]
    fn styles_are_injected_once() {
        let mut doc = Document::new();
        let retained = doc.create_element("span");
        let view = Labeled { retained, label: "one" };

        let a = mount(&mut doc, &view);
        let retained2 = doc.create_element("span");
        let other = Labeled { retained: retained2, label: "two" };
        let b = mount(&mut doc, &other);

        let styles = doc.elements_by_tag("style");
        assert_eq!(styles.len(), 1);
        assert_eq!(doc.text_content(styles[0]), ".labeled { display: flex; }");
        assert_ne!(a, b);
    }
}
