//! Renders a two-block page, scrolls through it and reports where the
//! shared surface ends up after each activation.
//!
//! Run with `cargo run -p oriel-site --example scroll_session`.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use oriel_site::{Site, SiteConfig};

const PAGE: &str = "# Hydra patterns\n\nA simple oscillator:\n\n```javascript\nosc(10, 0.1, 1).out()\n```\n\nAnd some noise:\n\n```javascript\nnoise(3).out()\n```\n";

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_target(false)
        .init();

    let mut site = Site::new(SiteConfig::default())?;
    site.render_page(PAGE)?;
    site.settle();
    report(&site, "after load");

    site.scroll_to(700.0);
    site.settle();
    report(&site, "after scrolling to the second block");

    site.scroll_to(0.0);
    site.settle();
    report(&site, "after scrolling back up");

    Ok(())
}

fn report(site: &Site, when: &str) {
    let plugin = site.plugin();
    let surface = plugin.surface().borrow();
    let holder = site
        .page()
        .doc
        .parent(surface.handle())
        .map(|node| node.to_string())
        .unwrap_or_else(|| "nobody".to_string());
    tracing::info!(when, holder = %holder, url = surface.current_url(), "surface state");
}
