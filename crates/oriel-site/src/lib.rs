//! Docs-page host harness.
//!
//! Stands in for the documentation framework the preview pipeline plugs
//! into: renders markdown pages to HTML, runs the plugin's lifecycle hooks
//! around each render, lays the resulting blocks out vertically and drives
//! viewport scrolling, so the whole activation pipeline can run (and be
//! tested) headlessly.

pub mod layout;
pub mod render;
pub mod session;
pub mod templates;

pub use layout::{layout_blocks, LayoutOptions};
pub use render::render_markdown;
pub use session::{Site, SiteConfig, SiteError};
pub use templates::PageShell;
