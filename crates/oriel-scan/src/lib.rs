//! Page-scan plugin.
//!
//! Integrates with a host rendering pipeline through three hooks: an HTML
//! rewrite that tags previewable code blocks, a document pass that replaces
//! each tagged block with a lazy preview, and a once-only mounted
//! notification. Both passes are idempotent, so a host that re-invokes its
//! hooks on navigation cannot duplicate previews.

pub mod config;
pub mod hooks;
pub mod plugin;
pub mod tag;
pub mod transform;

pub use config::ScanConfig;
pub use hooks::{HookError, HookRegistry};
pub use plugin::PageScanPlugin;
pub use tag::BlockTagger;
pub use transform::{extract_snippet, ScanOutcome};

/// Errors that can occur when setting up the scan plugin.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid marker pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
