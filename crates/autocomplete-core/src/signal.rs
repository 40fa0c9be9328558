//! Typed change notification.
//!
//! A [`Signal<Args>`] owns a table of observer callbacks keyed by
//! [`ConnectionId`]. The controller emits its signals only after releasing its
//! own state lock, and `emit` copies the callbacks out before running them, so
//! an observer is free to connect, disconnect, emit again, or call back into
//! the controller.
//!
//! ```
//! use autocomplete_core::Signal;
//!
//! let committed = Signal::<Option<String>>::new();
//! let id = committed.connect(|value| println!("committed {value:?}"));
//!
//! committed.emit(Some("pear".to_string()));
//! committed.disconnect(id);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle to one observer, for [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Observer<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of observers notified synchronously, in connection order, on the
/// emitting thread.
pub struct Signal<Args> {
    observers: Mutex<SlotMap<ConnectionId, Observer<Args>>>,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// A signal nobody listens to yet.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Register an observer.
    pub fn connect<F>(&self, observer: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.observers.lock().insert(Arc::new(observer))
    }

    /// Remove an observer. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.observers.lock().remove(id).is_some()
    }

    /// Notify every observer registered at the time of the call.
    #[tracing::instrument(skip_all, target = "autocomplete_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let observers: Vec<Observer<Args>> = self.observers.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, observers = observers.len(), "emit");

        for observer in observers {
            observer(&args);
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observers.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<Option<String>>: Send, Sync);
