//! Activation-URL derivation.
//!
//! The embedded tool accepts source code through a single `code` query
//! parameter whose value is the base64 encoding of the percent-encoded
//! source, prefixed with one newline. This is the entire wire contract;
//! the tool's response is never inspected.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left bare by `encodeURIComponent`: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string for use as a URL component.
pub fn encode_component(input: &str) -> String {
    percent_encode(input.as_bytes(), COMPONENT_SET).to_string()
}

/// The `code` query-parameter value for a piece of source text.
fn code_parameter(source: &str) -> String {
    BASE64_STANDARD.encode(encode_component(source))
}

/// The activation URL for a snippet: one leading newline, percent-encoded,
/// base64-encoded, appended as the `code` parameter on the tool's base URL.
pub fn activation_url(base_url: &str, snippet: &str) -> String {
    format!("{base_url}?code={}", code_parameter(&format!("\n{snippet}")))
}

/// The neutral URL the surface starts on: a single encoded space.
pub fn neutral_url(base_url: &str) -> String {
    format!("{base_url}?code={}", code_parameter(" "))
}
