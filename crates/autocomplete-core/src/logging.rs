//! Logging facilities.
//!
//! The controller is instrumented with the `tracing` crate. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("autocomplete::pipeline=debug,autocomplete_core=trace")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`] so each subsystem can
//! be filtered independently.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "autocomplete_core::signal";
    /// Debounce timer target.
    pub const TIMER: &str = "autocomplete_core::timer";
    /// Debounced fetch pipeline target.
    pub const PIPELINE: &str = "autocomplete::pipeline";
    /// Option list state and navigation target.
    pub const LIST: &str = "autocomplete::list";
    /// Selection and value resolution target.
    pub const SELECTION: &str = "autocomplete::selection";
    /// Attach/detach and host event target.
    pub const LIFECYCLE: &str = "autocomplete::lifecycle";
    /// [`PerfSpan`](super::PerfSpan) target.
    pub const PERF: &str = "autocomplete::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Times a synchronous section, such as mapping and installing a batch of
/// fetched candidates, when a timing-aware subscriber is installed. The guard
/// is `!Send`; never hold it across an `.await`.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
