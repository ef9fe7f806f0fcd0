//! Shared embedded surface and lazily-activated code previews.
//!
//! One [`SharedPreviewSurface`] per page carries the expensive embedded
//! frame; any number of [`LazyCodePreview`]s wrap code snippets and claim
//! the surface on first sufficient visibility, redirecting it to the
//! snippet's encoded URL.

pub mod config;
pub mod encode;
pub mod preview;
pub mod snippet;
pub mod surface;

pub use config::PreviewConfig;
pub use encode::{activation_url, neutral_url};
pub use preview::{ActivationPhase, LazyCodePreview};
pub use snippet::CodeSnippet;
pub use surface::{SharedPreviewSurface, SharedSurface};
