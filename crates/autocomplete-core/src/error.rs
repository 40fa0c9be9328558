//! Error types for the core primitives.

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No tokio runtime handle was supplied and none is ambient.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    /// A timer was configured with a zero quiet period.
    #[error("Debounce delay must be greater than zero")]
    ZeroDelay,
}

impl CoreError {
    /// Create a missing-runtime error.
    pub fn no_runtime(message: impl Into<String>) -> Self {
        Self::NoRuntime(message.into())
    }
}
