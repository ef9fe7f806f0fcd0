//! HTML tagging pass.
//!
//! A pure string rewrite over the host's rendered HTML, run before the
//! page reaches the document: every code block whose `data-lang` matches
//! the configured language gains the marker class. The pattern also
//! matches the already-tagged form and rewrites it to itself, so applying
//! the pass twice yields the once-applied output.

use regex::{NoExpand, Regex};

use crate::config::ScanConfig;
use crate::ScanError;

/// Compiled tagging rewrite for one scan configuration.
#[derive(Debug, Clone)]
pub struct BlockTagger {
    pattern: Regex,
    tagged: String,
}

impl BlockTagger {
    /// Compile the rewrite for a configuration.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let language = regex::escape(&config.language);
        let marker = regex::escape(&config.marker_class);
        // Case-insensitive like the host's own language attributes; the
        // optional suffix swallows a marker that is already present.
        let pattern = Regex::new(&format!(
            r#"(?i)data-lang="{language}"( class="{marker}")?"#
        ))?;
        let tagged = format!(
            r#"data-lang="{}" class="{}""#,
            config.language, config.marker_class
        );
        Ok(Self { pattern, tagged })
    }

    /// Rewrite rendered HTML, tagging every previewable code block.
    pub fn apply(&self, html: &str) -> String {
        self.pattern
            .replace_all(html, NoExpand(&self.tagged))
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tagger() -> BlockTagger {
        BlockTagger::new(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn tags_matching_blocks() {
        let html = r#"<pre data-lang="javascript"><code>osc().out()</code></pre>"#;

        assert_eq!(
            tagger().apply(html),
            r#"<pre data-lang="javascript" class="hydra-code"><code>osc().out()</code></pre>"#
        );
    }

    #[test]
    fn tagging_is_idempotent() {
        let html = r#"<p>intro</p><pre data-lang="javascript"><code>a</code></pre>"#;

        let once = tagger().apply(html);
        let twice = tagger().apply(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn matches_case_insensitively() {
        let html = r#"<pre DATA-LANG="JavaScript"><code>a</code></pre>"#;

        let tagged = tagger().apply(html);
        assert!(tagged.contains(r#"class="hydra-code""#));
    }

    #[test]
    fn leaves_other_languages_alone() {
        let html = r#"<pre data-lang="python"><code>print()</code></pre>"#;

        assert_eq!(tagger().apply(html), html);
    }

    #[test]
    fn tags_every_occurrence() {
        let html = r#"<pre data-lang="javascript"><code>a</code></pre>
<pre data-lang="javascript"><code>b</code></pre>"#;

        let tagged = tagger().apply(html);
        assert_eq!(tagged.matches("hydra-code").count(), 2);
    }

    #[test]
    fn config_tokens_are_escaped() {
        let config = ScanConfig {
            language: "c++".to_string(),
            ..ScanConfig::default()
        };
        let tagger = BlockTagger::new(&config).unwrap();

        let html = r#"<pre data-lang="c++"><code>int x;</code></pre>"#;
        let tagged = tagger.apply(html);
        assert!(tagged.contains(r#"data-lang="c++" class="hydra-code""#));

        // The escaped pattern must not have widened: "cxx" is untouched.
        let other = r#"<pre data-lang="cxx"><code>int x;</code></pre>"#;
        assert_eq!(tagger.apply(other), other);
    }
}
