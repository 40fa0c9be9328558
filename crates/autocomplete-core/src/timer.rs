//! Debounce timer.
//!
//! [`DebounceTimer`] is a single-slot one-shot timer: arming it replaces
//! whatever was armed before, so only the callback from the most recent
//! [`arm`](DebounceTimer::arm) fires, one quiet period after that call
//! (trailing edge).

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// Identifies one arming of a [`DebounceTimer`].
///
/// Ids increase monotonically per timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw u64 value of this timer ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// The armed slot: which arming is live and how to abort its task.
#[derive(Debug)]
struct Armed {
    id: TimerId,
    abort: AbortHandle,
}

#[derive(Debug, Default)]
struct Slot {
    armed: Option<Armed>,
    next_id: u64,
}

/// A re-armable, cancellable one-shot timer running on a tokio runtime.
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    handle: Handle,
    slot: std::sync::Arc<Mutex<Slot>>,
}

impl DebounceTimer {
    /// Create a timer that spawns on the given runtime.
    pub fn new(handle: Handle, delay: Duration) -> Result<Self> {
        if delay.is_zero() {
            return Err(CoreError::ZeroDelay);
        }
        Ok(Self {
            delay,
            handle,
            slot: std::sync::Arc::new(Mutex::new(Slot::default())),
        })
    }

    /// Create a timer on the runtime of the calling context.
    pub fn from_current(delay: Duration) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| CoreError::no_runtime(e.to_string()))?;
        Self::new(handle, delay)
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, cancelling any previously armed callback.
    ///
    /// `callback` runs on the runtime one quiet period from now unless the
    /// timer is re-armed or cancelled first. It receives the id this call
    /// returns, so owners can tell a late firing from the live one.
    pub fn arm<F>(&self, callback: F) -> TimerId
    where
        F: FnOnce(TimerId) + Send + 'static,
    {
        let mut slot = self.slot.lock();
        if let Some(previous) = slot.armed.take() {
            previous.abort.abort();
            tracing::trace!(target: targets::TIMER, id = previous.id.0, "timer re-armed");
        }

        slot.next_id += 1;
        let id = TimerId(slot.next_id);
        // Measured from now, not from when the task first gets polled.
        let deadline = tokio::time::Instant::now() + self.delay;
        let shared = self.slot.clone();

        let task = self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // An abort can race with the wake-up; only the live arming fires.
            let fire = {
                let mut slot = shared.lock();
                match slot.armed.as_ref() {
                    Some(armed) if armed.id == id => {
                        slot.armed = None;
                        true
                    }
                    _ => false,
                }
            };
            if fire {
                tracing::trace!(target: targets::TIMER, id = id.0, "timer fired");
                callback(id);
            }
        });

        slot.armed = Some(Armed {
            id,
            abort: task.abort_handle(),
        });
        id
    }

    /// Cancel the armed callback, if any.
    ///
    /// Returns `true` if a callback was pending.
    pub fn cancel(&self) -> bool {
        match self.slot.lock().armed.take() {
            Some(armed) => {
                armed.abort.abort();
                tracing::trace!(target: targets::TIMER, id = armed.id.0, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a callback is currently pending.
    pub fn is_armed(&self) -> bool {
        self.slot.lock().armed.is_some()
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
