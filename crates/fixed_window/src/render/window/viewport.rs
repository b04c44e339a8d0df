//! Viewport registry and dimension change fan-out
//!
//! Viewports are owned by whoever created them. The notifier only keeps weak
//! references, in registration order, and calls each live viewport's
//! [`Viewport::update_dimensions`] hook once per mode change. Viewports read
//! the new size from the [`RenderTarget`] they are handed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable identifier of a registered viewport
    pub struct ViewportId;
}

/// Something viewports render into and can query for its size
pub trait RenderTarget {
    /// Target name
    fn name(&self) -> &str;

    /// Current drawable width in pixels
    fn width(&self) -> u32;

    /// Current drawable height in pixels
    fn height(&self) -> u32;
}

/// Anything that must react when its render target changes size
pub trait Viewport {
    /// Called after the target's dimensions changed
    fn update_dimensions(&mut self, target: &dyn RenderTarget);
}

/// Ordered, non-owning viewport registry
#[derive(Default)]
pub struct ViewportNotifier {
    viewports: SlotMap<ViewportId, Weak<RefCell<dyn Viewport>>>,
    order: Vec<ViewportId>,
}

impl ViewportNotifier {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a viewport; it is notified after every earlier registration
    pub fn register<V: Viewport + 'static>(&mut self, viewport: &Rc<RefCell<V>>) -> ViewportId {
        let weak = Rc::downgrade(viewport);
        let weak: Weak<RefCell<dyn Viewport>> = weak;
        let id = self.viewports.insert(weak);
        self.order.push(id);
        id
    }

    /// Unregister a viewport. Returns false if `id` was not registered
    pub fn remove(&mut self, id: ViewportId) -> bool {
        if self.viewports.remove(id).is_none() {
            return false;
        }
        self.order.retain(|&other| other != id);
        true
    }

    /// Whether `id` is still registered
    pub fn contains(&self, id: ViewportId) -> bool {
        self.viewports.contains_key(id)
    }

    /// Number of registered viewports, including ones not yet pruned
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget viewports whose owners have dropped them
    pub fn prune(&mut self) -> usize {
        let dead: Vec<ViewportId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.viewports.get(id).map_or(true, |weak| weak.strong_count() == 0))
            .collect();

        for id in &dead {
            self.remove(*id);
        }
        dead.len()
    }

    /// Call every live viewport's hook once, in registration order
    ///
    /// Returns how many hooks ran. A viewport that is already mutably borrowed
    /// (its hook re-entered this call) is skipped.
    pub fn notify_dimensions_changed(&self, target: &dyn RenderTarget) -> usize {
        let mut notified = 0;
        for id in &self.order {
            let Some(viewport) = self.viewports.get(*id).and_then(Weak::upgrade) else {
                continue;
            };
            match viewport.try_borrow_mut() {
                Ok(mut viewport) => {
                    viewport.update_dimensions(target);
                    notified += 1;
                }
                Err(_) => log::warn!("Viewport {id:?} is busy, skipping dimension update"),
            };
        }
        notified
    }
}
