//! Single-threaded page runtime.
//!
//! Owns the document, the viewport, per-node layout, visibility observers
//! and a virtual-clock queue of one-shot deferred tasks. Everything runs
//! cooperatively on one thread: callbacks fire from [`Page::refresh_visibility`]
//! and [`Page::run_until_idle`], never concurrently.

use std::collections::{HashMap, HashSet};

use crate::document::{Document, NodeId};
use crate::geometry::{intersection_ratio, Rect};

/// Identifier for a registered visibility observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A delivered visibility notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// The observed node.
    pub target: NodeId,
    /// Fraction of the node's area inside the viewport.
    pub ratio: f64,
    /// Whether the ratio is at or above the observer's threshold.
    pub is_intersecting: bool,
}

type ObserverCallback = Box<dyn FnMut(&mut Page, &VisibilityEntry)>;

struct ObserverSlot {
    id: u64,
    target: NodeId,
    threshold: f64,
    last: Option<bool>,
    callback: ObserverCallback,
}

struct Task {
    due_ms: u64,
    seq: u64,
    run: Box<dyn FnOnce(&mut Page)>,
}

/// A live page: document plus the event sources that drive it.
pub struct Page {
    pub doc: Document,
    viewport: Rect,
    layout: HashMap<NodeId, Rect>,
    observers: Vec<ObserverSlot>,
    dead_observers: HashSet<u64>,
    tasks: Vec<Task>,
    now_ms: u64,
    next_observer: u64,
    next_task: u64,
}

impl Page {
    /// Create a page with an empty document and the given viewport.
    pub fn new(viewport: Rect) -> Self {
        Self {
            doc: Document::new(),
            viewport,
            layout: HashMap::new(),
            observers: Vec::new(),
            dead_observers: HashSet::new(),
            tasks: Vec::new(),
            now_ms: 0,
            next_observer: 0,
            next_task: 0,
        }
    }

    /// Current viewport rectangle.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Scroll the viewport to a vertical offset and notify observers.
    pub fn scroll_to(&mut self, y: f64) {
        self.viewport.y = y;
        self.refresh_visibility();
    }

    /// Resize the viewport and notify observers.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.refresh_visibility();
    }

    /// Assign a layout rectangle to a node.
    pub fn set_layout(&mut self, node: NodeId, rect: Rect) {
        self.layout.insert(node, rect);
    }

    /// Drop all layout assignments (done before a fresh layout pass).
    pub fn clear_layout(&mut self) {
        self.layout.clear();
    }

    /// The node's layout rectangle, if it has been laid out.
    pub fn layout_of(&self, node: NodeId) -> Option<Rect> {
        self.layout.get(&node).copied()
    }

    /// Fraction of the node visible in the viewport.
    ///
    /// A node that is hidden or has no layout is never visible.
    pub fn visibility_ratio(&self, node: NodeId) -> f64 {
        if self.doc.is_hidden(node) {
            return 0.0;
        }
        match self.layout.get(&node) {
            Some(rect) => intersection_ratio(rect, &self.viewport),
            None => 0.0,
        }
    }

    /// Observe a node's visibility against a threshold.
    ///
    /// The callback fires on the next [`Page::refresh_visibility`] after
    /// registration, then again whenever the intersecting state crosses the
    /// threshold in either direction.
    pub fn observe_visibility(
        &mut self,
        target: NodeId,
        threshold: f64,
        callback: impl FnMut(&mut Page, &VisibilityEntry) + 'static,
    ) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push(ObserverSlot {
            id,
            target,
            threshold,
            last: None,
            callback: Box::new(callback),
        });
        ObserverId(id)
    }

    /// Stop delivering notifications for an observer.
    pub fn unobserve(&mut self, id: ObserverId) {
        self.dead_observers.insert(id.0);
    }

    /// Re-evaluate every observer and deliver threshold crossings.
    pub fn refresh_visibility(&mut self) {
        if !self.dead_observers.is_empty() {
            let dead = std::mem::take(&mut self.dead_observers);
            self.observers.retain(|o| !dead.contains(&o.id));
        }

        // Dispatch against a detached list so callbacks may mutate the page
        // (and register further observers) without aliasing.
        let mut slots = std::mem::take(&mut self.observers);
        for slot in slots.iter_mut() {
            let ratio = self.visibility_ratio(slot.target);
            let intersecting = ratio >= slot.threshold;
            let changed = slot.last != Some(intersecting);
            slot.last = Some(intersecting);
            if changed {
                let entry = VisibilityEntry {
                    target: slot.target,
                    ratio,
                    is_intersecting: intersecting,
                };
                (slot.callback)(self, &entry);
            }
        }
        slots.extend(self.observers.drain(..));
        self.observers = slots;

        if !self.dead_observers.is_empty() {
            let dead = std::mem::take(&mut self.dead_observers);
            self.observers.retain(|o| !dead.contains(&o.id));
        }
    }

    /// Schedule a one-shot task `delay_ms` after the current virtual time.
    ///
    /// Tasks are not cancellable once scheduled.
    pub fn schedule_after(&mut self, delay_ms: u64, run: impl FnOnce(&mut Page) + 'static) {
        let seq = self.next_task;
        self.next_task += 1;
        self.tasks.push(Task {
            due_ms: self.now_ms + delay_ms,
            seq,
            run: Box::new(run),
        });
    }

    /// Number of tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Run deferred tasks in due order until none remain, advancing the
    /// virtual clock past each one. Tasks scheduled while draining run too.
    pub fn run_until_idle(&mut self) {
        loop {
            let next = self
                .tasks
                .iter()
                .enumerate()
                .min_by_key(|(_, t)| (t.due_ms, t.seq))
                .map(|(i, _)| i);
            let Some(index) = next else { break };
            let task = self.tasks.remove(index);
            self.now_ms = self.now_ms.max(task.due_ms);
            (task.run)(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn page_with_target() -> (Page, NodeId) {
        let mut page = Page::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let node = page.doc.create_element("div");
        let root = page.doc.root();
        page.doc.append_child(root, node).unwrap();
        page.set_layout(node, Rect::new(0.0, 1000.0, 800.0, 512.0));
        (page, node)
    }

    #[test]
    fn tasks_run_in_due_order() {
        let mut page = Page::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        page.schedule_after(60, move |_| o.borrow_mut().push("late"));
        let o = Rc::clone(&order);
        page.schedule_after(10, move |_| o.borrow_mut().push("early"));

        page.run_until_idle();

        assert_eq!(*order.borrow(), vec!["early", "late"]);
        assert_eq!(page.now_ms(), 60);
    }

    #[test]
    fn tasks_scheduled_while_draining_run() {
        let mut page = Page::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        page.schedule_after(5, move |page| {
            let h2 = Rc::clone(&h);
            page.schedule_after(5, move |_| *h2.borrow_mut() += 1);
        });

        page.run_until_idle();

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(page.now_ms(), 10);
    }

    #[test]
    fn observer_fires_on_threshold_crossings_only() {
        let (mut page, node) = page_with_target();
        let entries = Rc::new(RefCell::new(Vec::new()));

        let e = Rc::clone(&entries);
        page.observe_visibility(node, 0.5, move |_, entry| {
            e.borrow_mut().push(entry.is_intersecting);
        });

        // Initial delivery: not intersecting.
        page.refresh_visibility();
        // No change, no delivery.
        page.refresh_visibility();
        // Scrolled fully into view: crossing up.
        page.scroll_to(1000.0);
        // Still in view: no delivery.
        page.scroll_to(1010.0);
        // Scrolled away: crossing down.
        page.scroll_to(0.0);

        assert_eq!(*entries.borrow(), vec![false, true, false]);
    }

    #[test]
    fn threshold_is_respected() {
        let (mut page, node) = page_with_target();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        page.observe_visibility(node, 0.5, move |_, entry| {
            s.borrow_mut().push(entry.is_intersecting);
        });

        // Only ~20% of the 512-tall target is visible: below threshold.
        page.scroll_to(500.0);
        assert_eq!(*seen.borrow(), vec![false]);

        // Slightly over half visible: above threshold.
        page.scroll_to(700.0);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn hidden_nodes_are_never_visible() {
        let (mut page, node) = page_with_target();
        page.doc.set_hidden(node, true);
        page.scroll_to(1000.0);

        assert_eq!(page.visibility_ratio(node), 0.0);
    }

    #[test]
    fn unobserve_stops_delivery() {
        let (mut page, node) = page_with_target();
        let hits = Rc::new(RefCell::new(0));

        let h = Rc::clone(&hits);
        let id = page.observe_visibility(node, 0.5, move |_, _| *h.borrow_mut() += 1);

        page.refresh_visibility();
        page.unobserve(id);
        page.scroll_to(1000.0);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn callbacks_may_mutate_the_page() {
        let (mut page, node) = page_with_target();

        page.observe_visibility(node, 0.5, move |page, entry| {
            if entry.is_intersecting {
                let marker = page.doc.create_element("div");
                let root = page.doc.root();
                page.doc.append_child(root, marker).unwrap();
                page.schedule_after(60, |_| {});
            }
        });

        page.scroll_to(1000.0);

        assert_eq!(page.pending_tasks(), 1);
        page.run_until_idle();
    }
}
