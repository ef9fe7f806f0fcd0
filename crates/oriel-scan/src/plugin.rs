//! The page-scan plugin.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use oriel_dom::{NodeId, Page};
use oriel_preview::{LazyCodePreview, SharedPreviewSurface, SharedSurface};

use crate::config::ScanConfig;
use crate::hooks::HookRegistry;
use crate::tag::BlockTagger;
use crate::transform::transform_page;
use crate::ScanError;

/// Scans rendered pages for previewable code blocks and swaps each for a
/// lazy preview sharing one surface.
///
/// Installing the plugin constructs the page-scoped surface and registers
/// the lifecycle hooks; the returned handle shares state with those hooks
/// so the host (and tests) can inspect what the scan produced.
pub struct PageScanPlugin {
    surface: SharedSurface,
    previews: Rc<RefCell<Vec<LazyCodePreview>>>,
    processed: Rc<RefCell<HashSet<NodeId>>>,
}

impl PageScanPlugin {
    /// Install the plugin into a page session.
    pub fn install(
        page: &mut Page,
        hooks: &mut HookRegistry,
        config: ScanConfig,
    ) -> Result<Self, ScanError> {
        let tagger = BlockTagger::new(&config)?;
        let surface = SharedPreviewSurface::new(&mut page.doc, &config.preview);
        let previews: Rc<RefCell<Vec<LazyCodePreview>>> = Rc::new(RefCell::new(Vec::new()));
        let processed: Rc<RefCell<HashSet<NodeId>>> = Rc::new(RefCell::new(HashSet::new()));

        hooks.after_each(move |html, next| next(tagger.apply(&html)));

        let marker_class = config.marker_class.clone();
        let preview_config = config.preview.clone();
        let hook_surface = Rc::clone(&surface);
        let hook_previews = Rc::clone(&previews);
        let hook_processed = Rc::clone(&processed);
        hooks.done_each(move |page| {
            let outcome = transform_page(
                page,
                &hook_surface,
                &preview_config,
                &marker_class,
                &hook_processed,
                &hook_previews,
            );
            if outcome.transformed > 0 {
                tracing::info!(
                    blocks = outcome.transformed,
                    "live previews installed on page"
                );
            }
        });

        hooks.mounted(|_page| {
            tracing::debug!("initial page mounted");
        });

        Ok(Self {
            surface,
            previews,
            processed,
        })
    }

    /// The page-scoped shared surface.
    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }

    /// Previews created so far, in document order of creation.
    pub fn previews(&self) -> std::cell::Ref<'_, Vec<LazyCodePreview>> {
        self.previews.borrow()
    }

    /// Number of previews created so far.
    pub fn preview_count(&self) -> usize {
        self.previews.borrow().len()
    }

    /// Forget per-block tracking and release the previews' observers.
    ///
    /// Not required by the scanned-page flow (abandoned previews go quiet
    /// on their own); an affordance for hosts that rebuild the document
    /// wholesale and want the old observers gone.
    pub fn clear(&self, page: &mut Page) {
        for preview in self.previews.borrow().iter() {
            preview.release(page);
        }
        self.previews.borrow_mut().clear();
        self.processed.borrow_mut().clear();
    }
}
