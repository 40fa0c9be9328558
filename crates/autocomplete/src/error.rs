//! Error types for the autocomplete controller.

use std::fmt;

use autocomplete_core::CoreError;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, AutocompleteError>;

/// A host collaborator the controller cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The text field the controller takes over.
    Input,
    /// The container the option list is rendered into.
    OptionList,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input field"),
            Self::OptionList => write!(f, "options container"),
        }
    }
}

/// Errors raised while building or wiring a controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutocompleteError {
    /// A required anchor was not provided.
    #[error("No {0} provided to take control of")]
    MissingAnchor(Anchor),

    /// `attach` was called on a controller that is already attached.
    #[error("Controller is already attached")]
    AlreadyAttached,

    /// The configuration could not be parsed or is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A core primitive could not be created.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AutocompleteError {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// An error returned by a fetch collaborator.
///
/// The controller never recovers from these; it reports them through
/// [`Autocomplete::fetch_failed`](crate::Autocomplete::fetch_failed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The fetch observed its cancellation token and gave up.
    #[error("Fetch was cancelled")]
    Cancelled,

    /// The fetch failed.
    #[error("Fetch failed: {0}")]
    Failed(String),
}

impl FetchError {
    /// Create a failure from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A failed fetch, as reported to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The query the fetch was issued for.
    pub query: String,
    /// What went wrong.
    pub error: FetchError,
}
