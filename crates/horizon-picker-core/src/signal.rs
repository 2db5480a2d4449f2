//! Outward notifications.
//!
//! A component reports to its host through a [`Signal`]: the host connects
//! slots, the component emits, and every slot sees the arguments by
//! reference in the order it was connected.
//!
//! # Re-entrancy
//!
//! Slots are invoked on the emitting thread, after the connection table has
//! been released. A slot may therefore connect, disconnect, or emit on the
//! same signal without deadlocking. Connections made during an emission take
//! effect from the next emission on.
//!
//! # Example
//!
//! ```
//! use horizon_picker_core::Signal;
//!
//! let model_updated = Signal::<Option<String>>::new();
//!
//! let id = model_updated.connect(|value| match value {
//!     Some(date) => println!("picked {date}"),
//!     None => println!("cleared"),
//! });
//!
//! model_updated.emit(Some("2024-01-05".to_owned()));
//! model_updated.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Key of one connection, accepted by [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// A connected slot.
type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A signal carrying `Args` to any number of slots.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// A signal with nothing connected.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect `slot`. It runs after every slot connected before it.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect one slot. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Run every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "horizon_picker_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        // Slots run with the table unlocked
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emitting");

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
