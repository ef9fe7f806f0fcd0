//! Page session driving the full lifecycle.

use serde::{Deserialize, Serialize};

use oriel_dom::{parse_fragment, serialize, NodeId, Page, ParseError, Rect};
use oriel_scan::{HookError, HookRegistry, PageScanPlugin, ScanConfig, ScanError};

use crate::layout::{layout_blocks, LayoutOptions};
use crate::render::render_markdown;
use crate::templates::PageShell;

/// Configuration for a page session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, used by the export shell.
    pub title: String,

    /// Viewport width in logical units.
    pub viewport_width: f64,

    /// Viewport height in logical units.
    pub viewport_height: f64,

    /// Scan plugin configuration.
    pub scan: ScanConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            viewport_width: 800.0,
            viewport_height: 600.0,
            scan: ScanConfig::default(),
        }
    }
}

/// Errors that can occur while driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("scan plugin rejected configuration: {0}")]
    Scan(#[from] ScanError),

    #[error("hook contract violated: {0}")]
    Hook(#[from] HookError),

    #[error("rendered page markup rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("export template failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// A live documentation page session.
///
/// Owns the page runtime, the hook registry and the installed scan plugin;
/// each [`render_page`] call runs the host's render cycle: render markdown,
/// run the HTML transforms, mount the result, fire the completion hooks,
/// lay the page out and notify visibility observers.
///
/// [`render_page`]: Site::render_page
pub struct Site {
    config: SiteConfig,
    page: Page,
    hooks: HookRegistry,
    plugin: PageScanPlugin,
    content_root: NodeId,
    shell: PageShell,
    layout: LayoutOptions,
}

impl Site {
    /// Create a session and install the scan plugin.
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        let viewport = Rect::new(0.0, 0.0, config.viewport_width, config.viewport_height);
        let mut page = Page::new(viewport);

        let root = page.doc.root();
        let content_root = page.doc.create_element("main");
        page.doc.add_class(content_root, "content");
        page.doc
            .append_child(root, content_root)
            .expect("content root attaches under the document root");

        let mut hooks = HookRegistry::new();
        let plugin = PageScanPlugin::install(&mut page, &mut hooks, config.scan.clone())?;

        let layout = LayoutOptions {
            content_width: config.viewport_width,
            placeholder_height: f64::from(config.scan.preview.surface_edge),
            ..LayoutOptions::default()
        };

        Ok(Self {
            config,
            page,
            hooks,
            plugin,
            content_root,
            shell: PageShell::new(),
            layout,
        })
    }

    /// Render a markdown page through the full lifecycle.
    ///
    /// Re-rendering replaces the page content; previews from the previous
    /// page are abandoned in place and never reactivate.
    pub fn render_page(&mut self, markdown: &str) -> Result<(), SiteError> {
        let html = render_markdown(markdown);
        let html = self.hooks.run_after_each(html)?;

        self.page.doc.detach_children(self.content_root);
        parse_fragment(&mut self.page.doc, self.content_root, &html)?;

        self.hooks.run_done_each(&mut self.page);

        // Transformed originals are hidden now; lay out what remains and
        // let observers see the fresh geometry.
        layout_blocks(&mut self.page, self.content_root, &self.layout);
        self.page.refresh_visibility();

        self.hooks.run_mounted(&mut self.page);
        tracing::info!(previews = self.plugin.preview_count(), "page rendered");
        Ok(())
    }

    /// Scroll the viewport, notifying visibility observers.
    pub fn scroll_to(&mut self, y: f64) {
        self.page.scroll_to(y);
    }

    /// Drain deferred work (activation settle delays included).
    pub fn settle(&mut self) {
        self.page.run_until_idle();
    }

    /// Export the live document as a standalone HTML page.
    pub fn export_html(&self) -> Result<String, SiteError> {
        let body = serialize(&self.page.doc, self.page.doc.root());
        Ok(self.shell.render(&self.config.title, &body)?)
    }

    /// The underlying page runtime.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable access to the page runtime.
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// The installed scan plugin.
    pub fn plugin(&self) -> &PageScanPlugin {
        &self.plugin
    }

    /// The element the rendered page mounts under.
    pub fn content_root(&self) -> NodeId {
        self.content_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_plain_page() {
        let mut site = Site::new(SiteConfig::default()).unwrap();

        site.render_page("# Hello\n\nNo code here.").unwrap();

        assert_eq!(site.plugin().preview_count(), 0);
        let heading = site.page().doc.elements_by_tag("h1");
        assert_eq!(heading.len(), 1);
    }

    #[test]
    fn rerender_replaces_page_content() {
        let mut site = Site::new(SiteConfig::default()).unwrap();

        site.render_page("# First").unwrap();
        site.render_page("# Second").unwrap();

        let headings = site.page().doc.elements_by_tag("h1");
        assert_eq!(headings.len(), 1);
        assert_eq!(site.page().doc.text_content(headings[0]), "Second");
    }

    #[test]
    fn export_wraps_the_document_in_the_shell() {
        let mut site = Site::new(SiteConfig::default()).unwrap();
        site.render_page("# Export me").unwrap();

        let html = site.export_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Documentation</title>"));
        assert!(html.contains("Export me"));
    }
}
