//! Cooperative cancellation for in-flight fetches.
//!
//! A [`CancellationToken`] is handed to the fetch collaborator alongside the
//! query. Cancelling records *why* the work was abandoned, so observers and
//! tests can tell a superseded search from a cleared input or a teardown even
//! though all three are handled the same way.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Notify;

/// Why a pending fetch was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// A newer search replaced this one.
    Superseded,
    /// The input was cleared.
    Cleared,
    /// The controller was detached or dropped.
    Teardown,
}

impl CancelReason {
    fn to_raw(self) -> u8 {
        match self {
            Self::Superseded => 1,
            Self::Cleared => 2,
            Self::Teardown => 3,
        }
    }

    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Superseded),
            2 => Some(Self::Cleared),
            3 => Some(Self::Teardown),
            _ => None,
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superseded => write!(f, "a new search has been performed"),
            Self::Cleared => write!(f, "the input has been cleared"),
            Self::Teardown => write!(f, "the controller is being destroyed"),
        }
    }
}

const NOT_CANCELLED: u8 = 0;

/// A cancellation token for async work.
///
/// Clones share state. Supports both polling ([`is_cancelled`](Self::is_cancelled))
/// and async waiting ([`cancelled`](Self::cancelled)). The first cancellation
/// wins; later calls keep the original reason.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

struct CancellationState {
    reason: AtomicU8,
    notify: Notify,
}

impl CancellationToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationState {
                reason: AtomicU8::new(NOT_CANCELLED),
                notify: Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.reason.load(Ordering::Acquire) != NOT_CANCELLED
    }

    /// The reason passed to the first successful [`cancel`](Self::cancel).
    pub fn reason(&self) -> Option<CancelReason> {
        CancelReason::from_raw(self.inner.reason.load(Ordering::Acquire))
    }

    /// Request cancellation.
    ///
    /// Returns `true` if this call cancelled the token, `false` if it was
    /// already cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let swapped = self
            .inner
            .reason
            .compare_exchange(
                NOT_CANCELLED,
                reason.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if swapped {
            self.inner.notify.notify_waiters();
        }
        swapped
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// Returns immediately if already cancelled.
    pub async fn cancelled(&self) -> CancelReason {
        loop {
            let notified = self.inner.notify.notified();
            if let Some(reason) = self.reason() {
                return reason;
            }
            notified.await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("reason", &self.reason())
            .finish()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
