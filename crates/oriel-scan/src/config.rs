//! Scan configuration.

use serde::{Deserialize, Serialize};

use oriel_preview::PreviewConfig;

/// Configuration for the page-scan plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Language token that marks a code block as previewable, matched
    /// against the block's `data-lang` attribute.
    pub language: String,

    /// Class added to tagged blocks; doubles as the selector the document
    /// pass looks for and as the tagging idempotence guard.
    pub marker_class: String,

    /// Surface and activation settings handed to each preview.
    pub preview: PreviewConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            marker_class: "hydra-code".to_string(),
            preview: PreviewConfig::default(),
        }
    }
}
