//! Host pipeline hooks.
//!
//! Models the rendering pipeline's lifecycle surface as the plugin needs
//! it: `after_each` transforms the rendered HTML string before it reaches
//! the document, `done_each` runs once the HTML is live, and `mounted`
//! fires once after the first full page load.

use oriel_dom::Page;

/// Errors raised by the hook contract itself.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("after_each hook finished without calling next")]
    NextNotCalled,

    #[error("after_each hook called next {0} times")]
    NextCalledAgain(usize),
}

type AfterEachHook = Box<dyn FnMut(String, &mut dyn FnMut(String))>;
type PageHook = Box<dyn FnMut(&mut Page)>;

/// Registered lifecycle hooks for one page session.
#[derive(Default)]
pub struct HookRegistry {
    after_each: Vec<AfterEachHook>,
    done_each: Vec<PageHook>,
    mounted: Vec<PageHook>,
    mounted_fired: bool,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous HTML transform.
    ///
    /// The hook receives the current HTML and a `next` continuation it
    /// must call exactly once with the (possibly unmodified) result.
    pub fn after_each(&mut self, hook: impl FnMut(String, &mut dyn FnMut(String)) + 'static) {
        self.after_each.push(Box::new(hook));
    }

    /// Register a hook that runs after the rendered HTML is live.
    pub fn done_each(&mut self, hook: impl FnMut(&mut Page) + 'static) {
        self.done_each.push(Box::new(hook));
    }

    /// Register a hook that fires once, after the first full page load.
    pub fn mounted(&mut self, hook: impl FnMut(&mut Page) + 'static) {
        self.mounted.push(Box::new(hook));
    }

    /// Run the HTML transform chain.
    ///
    /// A hook that breaks the call-next-exactly-once contract aborts the
    /// chain with an error; the host decides how loudly to fail.
    pub fn run_after_each(&mut self, html: String) -> Result<String, HookError> {
        let mut current = html;
        for hook in &mut self.after_each {
            let mut result: Option<String> = None;
            let mut calls = 0usize;
            hook(current, &mut |out| {
                calls += 1;
                if result.is_none() {
                    result = Some(out);
                }
            });
            match (calls, result) {
                (1, Some(out)) => current = out,
                (0, _) => return Err(HookError::NextNotCalled),
                (n, _) => return Err(HookError::NextCalledAgain(n)),
            }
        }
        Ok(current)
    }

    /// Run every completion hook against the live page.
    pub fn run_done_each(&mut self, page: &mut Page) {
        for hook in &mut self.done_each {
            hook(page);
        }
    }

    /// Run the mounted hooks if they have not fired yet.
    pub fn run_mounted(&mut self, page: &mut Page) {
        if self.mounted_fired {
            return;
        }
        self.mounted_fired = true;
        for hook in &mut self.mounted {
            hook(page);
        }
    }
}
