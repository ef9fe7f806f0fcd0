//! Captured source snippets.

use std::fmt;

/// The source text of one documentation code block, captured verbatim.
///
/// Immutable after construction; whitespace and newlines are preserved
/// exactly and no encoding happens until activation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet(String);

impl CodeSnippet {
    /// Capture a snippet.
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// The snippet text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CodeSnippet {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for CodeSnippet {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl fmt::Display for CodeSnippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_verbatim() {
        let snippet = CodeSnippet::new("  osc(10)\n    .out()\n");
        assert_eq!(snippet.as_str(), "  osc(10)\n    .out()\n");
    }
}
