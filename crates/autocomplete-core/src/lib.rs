//! Core primitives for the autocomplete controller.
//!
//! This crate provides the building blocks the controller is assembled from:
//!
//! - **Signal/Slot System**: Type-safe change notification to observers
//! - **Cancellation**: Cooperative cancellation tokens with a labelled cause
//! - **Debounce Timer**: A single-slot, re-armable, trailing-edge one-shot timer
//! - **Logging**: Tracing targets for filtering per subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use autocomplete_core::Signal;
//!
//! let value_changed = Signal::<Option<i32>>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {:?}", value);
//! });
//!
//! value_changed.emit(Some(42));
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Debounce Example
//!
//! ```no_run
//! use autocomplete_core::DebounceTimer;
//! use std::time::Duration;
//!
//! # async fn demo() -> autocomplete_core::Result<()> {
//! let timer = DebounceTimer::from_current(Duration::from_millis(300))?;
//!
//! // Only the last call within the quiet period fires.
//! timer.arm(|_| println!("first"));
//! timer.arm(|id| println!("second, armed as {id:?}"));
//! # Ok(())
//! # }
//! ```

mod cancel;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use cancel::{CancelReason, CancellationToken};
pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use timer::{DebounceTimer, TimerId};
