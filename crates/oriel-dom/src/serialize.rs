//! Tree-to-HTML serialization.

use crate::document::{Document, NodeId};

/// Serialize a node and its subtree to HTML.
pub fn serialize(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serialize only the children of a node (its inner HTML).
pub fn serialize_children(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    if let Some(text) = doc.text(node) {
        out.push_str(&escape_text(text));
        return;
    }

    let tag = doc.tag(node).unwrap_or("div");
    out.push('<');
    out.push_str(tag);
    for (name, value) in doc.attrs(node) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
    for &child in doc.children(node) {
        write_node(doc, child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Escape text content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_subtree() {
        let mut doc = Document::new();
        let pre = doc.create_element("pre");
        doc.set_attr(pre, "data-lang", "javascript");
        let code = doc.create_element("code");
        let text = doc.create_text("a < b && c > d");
        doc.append_child(doc.root(), pre).unwrap();
        doc.append_child(pre, code).unwrap();
        doc.append_child(code, text).unwrap();

        assert_eq!(
            serialize(&doc, pre),
            r#"<pre data-lang="javascript"><code>a &lt; b &amp;&amp; c &gt; d</code></pre>"#
        );
    }

    #[test]
    fn escapes_attribute_quotes() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "title", r#"say "hi""#);

        assert_eq!(serialize(&doc, div), r#"<div title="say &quot;hi&quot;"></div>"#);
    }

    #[test]
    fn inner_html_omits_the_node_itself() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        let text = doc.create_text("body");
        doc.append_child(doc.root(), div).unwrap();
        doc.append_child(div, p).unwrap();
        doc.append_child(p, text).unwrap();

        assert_eq!(serialize_children(&doc, div), "<p>body</p>");
    }
}
