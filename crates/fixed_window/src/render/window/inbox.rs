//! Single-slot inbox for host mode change events
//!
//! The host may report a dock or undock at any time, including from inside
//! engine callbacks. Instead of reacting on the spot, it posts into this inbox
//! and the engine drains it once per tick. Posts between two drains collapse
//! into one event.

use std::cell::Cell;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct Slot {
    pending: Cell<bool>,
    posts: Cell<u32>,
}

/// Receiving side, owned by the window manager
#[derive(Debug, Default)]
pub struct ModeChangeInbox {
    slot: Rc<Slot>,
}

impl ModeChangeInbox {
    /// Create an empty inbox
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle the host can post through
    pub fn sender(&self) -> ModeChangeSender {
        ModeChangeSender {
            slot: Rc::downgrade(&self.slot),
        }
    }

    /// Whether a mode change is waiting
    pub fn is_pending(&self) -> bool {
        self.slot.pending.get()
    }

    /// Empty the slot. Returns how many posts were collapsed into it
    pub fn take(&self) -> Option<u32> {
        if !self.slot.pending.replace(false) {
            return None;
        }
        Some(self.slot.posts.replace(0))
    }
}

/// Posting side, handed to the host
#[derive(Debug, Clone)]
pub struct ModeChangeSender {
    slot: Weak<Slot>,
}

impl ModeChangeSender {
    /// Report that the operation mode may have changed
    ///
    /// Returns false once the receiving window manager is gone.
    pub fn post(&self) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        slot.pending.set(true);
        slot.posts.set(slot.posts.get().saturating_add(1));
        true
    }
}
