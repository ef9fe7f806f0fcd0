//! HTML fragment parser.
//!
//! Parses the well-formed HTML fragments the rendering pipeline produces
//! into the arena tree. Attribute decoding is lenient (a bad attribute is
//! kept as raw bytes rather than failing the page); structural errors
//! surface as [`ParseError`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::document::{Document, DomError, NodeId};

/// Errors that can occur while parsing a fragment.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("text decoding failed: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("tree rejected parsed node: {0}")]
    Tree(#[from] DomError),
}

/// Parse an HTML fragment and attach its nodes under `parent`.
///
/// The fragment may have any number of top-level elements. Unknown entity
/// references are preserved verbatim as `&name;` text.
pub fn parse_fragment(doc: &mut Document, parent: NodeId, html: &str) -> Result<(), ParseError> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);

    let mut stack = vec![parent];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let id = element_from(doc, &reader, &e);
                doc.append_child(current(&stack), id)?;
                stack.push(id);
            }
            Event::Empty(e) => {
                let id = element_from(doc, &reader, &e);
                doc.append_child(current(&stack), id)?;
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                push_text(doc, current(&stack), &text)?;
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?.into_owned();
                push_text(doc, current(&stack), &decode_entity(&name))?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_text(doc, current(&stack), &text)?;
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    Ok(())
}

fn current(stack: &[NodeId]) -> NodeId {
    *stack.last().expect("parse stack holds at least the parent")
}

fn element_from<R>(doc: &mut Document, reader: &Reader<R>, e: &BytesStart) -> NodeId {
    let tag = decode_bytes(reader, e.name().as_ref());
    let id = doc.create_element(&tag);

    for attr in e.attributes().flatten() {
        let key = decode_bytes(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        doc.set_attr(id, &key, &value);
    }

    id
}

fn decode_bytes<R>(reader: &Reader<R>, bytes: &[u8]) -> String {
    reader.decoder().decode(bytes).map_or_else(
        |_| String::from_utf8_lossy(bytes).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

/// Append text under `parent`, coalescing with a trailing text sibling.
fn push_text(doc: &mut Document, parent: NodeId, text: &str) -> Result<(), DomError> {
    if text.is_empty() {
        return Ok(());
    }
    if let Some(&last) = doc.children(parent).last() {
        if doc.text(last).is_some() {
            doc.append_text(last, text);
            return Ok(());
        }
    }
    let node = doc.create_text(text);
    doc.append_child(parent, node)
}

/// Decode an entity reference to its character value.
fn decode_entity(name: &str) -> String {
    match name {
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        "nbsp" => "\u{00a0}".to_string(),
        s if s.starts_with('#') => {
            let code = if let Some(hex) = s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{name};"), |c| c.to_string())
        }
        _ => format!("&{name};"),
    }
}
