//! The data source collaborator.
//!
//! A [`DataSource`] is how the host plugs data into the controller: it fetches
//! raw results for a query and maps them into options. The controller owns
//! the sequencing (debounce, cancellation, stale-result discard); the source
//! only answers queries.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use autocomplete_core::CancellationToken;
use autocomplete_core::logging::targets;

use crate::error::FetchError;
use crate::option::AutocompleteOption;

/// Supplies options for a query.
///
/// Only [`to_option`](Self::to_option) must be implemented. The default
/// [`fetch`](Self::fetch) logs a warning and returns nothing so an unwired
/// controller is noticeable rather than silently empty.
pub trait DataSource: Send + Sync + 'static {
    /// A result item as returned by the backend.
    type Raw: Send + 'static;
    /// The value committed when an option is selected.
    type Value: Clone + Send + Sync + 'static;

    /// Fetch raw results for `query`.
    ///
    /// `cancel` is triggered when the result is no longer wanted. Honouring
    /// it is best-effort; results of a cancelled fetch are discarded anyway.
    fn fetch(
        &self,
        query: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Vec<Self::Raw>, FetchError>> + Send {
        async move {
            tracing::warn!(
                target: targets::PIPELINE,
                query = %query,
                cancelled = cancel.is_cancelled(),
                "DataSource::fetch is not implemented; no options will ever be shown"
            );
            Ok(Vec::new())
        }
    }

    /// Map one raw result into an option. `None` filters the item out.
    fn to_option(&self, raw: Self::Raw) -> Option<AutocompleteOption<Self::Value>>;

    /// Map a committed value back into an option, to derive the input text.
    ///
    /// Returning `None` lets the controller fall back to the option that was
    /// selected (or to empty text when clearing).
    fn value_to_option(&self, value: &Self::Value) -> Option<AutocompleteOption<Self::Value>> {
        let _ = value;
        None
    }
}

/// Build an option whose label is the value's text form.
pub fn string_option<T: fmt::Display>(raw: T) -> AutocompleteOption<T> {
    AutocompleteOption::new(raw.to_string(), raw)
}

/// A string source with no backend wired in.
///
/// Fetching warns and yields nothing; mapping uses [`string_option`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSource;

impl DataSource for DefaultSource {
    type Raw = String;
    type Value = String;

    fn to_option(&self, raw: String) -> Option<AutocompleteOption<String>> {
        Some(string_option(raw))
    }

    fn value_to_option(&self, value: &String) -> Option<AutocompleteOption<String>> {
        Some(string_option(value.clone()))
    }
}

/// A string source backed by an async closure.
///
/// ```no_run
/// use autocomplete::{FnSource, FetchError};
///
/// let source = FnSource::new(|query: String, _cancel| async move {
///     Ok::<_, FetchError>(vec![format!("{query}-1"), format!("{query}-2")])
/// });
/// ```
pub struct FnSource<F, Fut> {
    fetch: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnSource<F, Fut>
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, FetchError>> + Send + 'static,
{
    /// Wrap a fetch closure.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            _future: PhantomData,
        }
    }
}

impl<F, Fut> DataSource for FnSource<F, Fut>
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, FetchError>> + Send + 'static,
{
    type Raw = String;
    type Value = String;

    fn fetch(
        &self,
        query: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send {
        (self.fetch)(query, cancel)
    }

    fn to_option(&self, raw: String) -> Option<AutocompleteOption<String>> {
        Some(string_option(raw))
    }

    fn value_to_option(&self, value: &String) -> Option<AutocompleteOption<String>> {
        Some(string_option(value.clone()))
    }
}

impl<F, Fut> fmt::Debug for FnSource<F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}
