//! Section lifetimes for asynchronous content.
//!
//! A section that starts a fetch owns a [`SectionSlot`]; the fetch job owns
//! the matching [`Delivery`]. The two share a [`Mount`] liveness token:
//!
//! ```text
//! slot()  ──►  (SectionSlot, Delivery)
//!                  │             │ deliver(value)
//!                  │             ▼
//!                  │      mounted? ── yes ─► stored, returns true
//!                  │             └─── no ──► dropped silently, returns false
//!                  ▼
//!            drop / unmount()  ─►  mount marked dead
//! ```
//!
//! Once a slot is unmounted no delivery can reach it, and nothing is reported
//! to anyone. This is how a fetch that outlives its section is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Shared liveness flag for one mounted section.
#[derive(Debug, Clone)]
pub struct Mount {
    alive: Arc<AtomicBool>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

/// The receiving side: where a section's content lands.
///
/// Dropping the slot unmounts it.
#[derive(Debug)]
pub struct SectionSlot<T> {
    mount: Mount,
    value: Arc<Mutex<Option<T>>>,
}

/// The sending side, moved into the fetch job.
#[derive(Debug)]
pub struct Delivery<T> {
    mount: Mount,
    value: Arc<Mutex<Option<T>>>,
}

/// Create a connected slot/delivery pair for a freshly mounted section.
pub fn slot<T>() -> (SectionSlot<T>, Delivery<T>) {
    let mount = Mount::new();
    let value = Arc::new(Mutex::new(None));
    (
        SectionSlot {
            mount: mount.clone(),
            value: Arc::clone(&value),
        },
        Delivery { mount, value },
    )
}

impl<T> SectionSlot<T> {
    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Take the delivered value, if one arrived.
    pub fn take(&self) -> Option<T> {
        self.value.lock().ok()?.take()
    }

    /// Mark the section dead. Serialized with [`Delivery::deliver`], so once
    /// this returns no value can land in the slot.
    pub fn unmount(&self) {
        let _guard = self.value.lock();
        self.mount.unmount();
    }
}

impl<T> Drop for SectionSlot<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<T> Delivery<T> {
    /// Store `value` if the section is still mounted. Returns whether it was
    /// kept.
    pub fn deliver(self, value: T) -> bool {
        let Ok(mut guard) = self.value.lock() else {
            return false;
        };
        if !self.mount.is_mounted() {
            trace!("section unmounted, discarding late result");
            return false;
        }
        *guard = Some(value);
        true
    }
}
