//! The autocomplete controller.
//!
//! [`Autocomplete`] ties the pieces together:
//!
//! - **Debounced fetch pipeline**: keystrokes arm a [`DebounceTimer`]; when it
//!   fires a fetch is issued under a fresh token, superseding the previous
//!   one. Only the current token's result is ever installed.
//! - **Option list state** and **navigation**: see [`OptionList`].
//! - **Selection/value resolution**: committing a value clears the list,
//!   rewrites the input text and emits [`value_changed`](Autocomplete::value_changed).
//! - **Lifecycle**: [`attach`](Autocomplete::attach) /
//!   [`detach`](Autocomplete::detach); events are ignored while detached.
//!
//! # Example
//!
//! ```no_run
//! use autocomplete::{Autocomplete, FnSource, FetchError, Key};
//! # use autocomplete::{AutocompleteOption, ListView, TextField};
//! # struct Field;
//! # impl TextField for Field {
//! #     fn set_text(&self, _: &str) {}
//! #     fn set_expanded(&self, _: bool) {}
//! # }
//! # struct List;
//! # impl ListView<String> for List {
//! #     fn render(&self, _: &[AutocompleteOption<String>], _: Option<usize>) {}
//! #     fn highlight(&self, _: Option<usize>) {}
//! #     fn set_visible(&self, _: bool) {}
//! # }
//!
//! # async fn demo() -> autocomplete::Result<()> {
//! let source = FnSource::new(|query: String, _cancel| async move {
//!     Ok::<_, FetchError>(vec![format!("{query} street"), format!("{query} avenue")])
//! });
//!
//! let autocomplete = Autocomplete::builder(source)
//!     .text_field(Field)
//!     .list_view(List)
//!     .build()?;
//!
//! autocomplete.value_changed().connect(|value| println!("committed {value:?}"));
//! autocomplete.attach()?;
//!
//! autocomplete.on_input_changed("Main");
//! // ... 300ms later the list opens ...
//! autocomplete.on_key_down(Key::ArrowDown);
//! autocomplete.on_key_down(Key::Enter);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use autocomplete_core::logging::targets;
use autocomplete_core::{
    CancelReason, CancellationToken, CoreError, DebounceTimer, PerfSpan, Signal, TimerId,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::config::AutocompleteConfig;
use crate::error::{Anchor, AutocompleteError, FetchError, FetchFailure, Result};
use crate::list::OptionList;
use crate::navigation::Direction;
use crate::option::AutocompleteOption;
use crate::source::DataSource;
use crate::view::{ClearButton, Key, KeyOutcome, ListView, TextField};

// ============================================================================
// Builder
// ============================================================================

/// Builds an [`Autocomplete`], checking that every required anchor is wired.
pub struct AutocompleteBuilder<S: DataSource> {
    source: S,
    config: AutocompleteConfig,
    runtime: Option<Handle>,
    text_field: Option<Box<dyn TextField>>,
    list_view: Option<Box<dyn ListView<S::Value>>>,
    clear_button: Option<Box<dyn ClearButton>>,
}

impl<S: DataSource> AutocompleteBuilder<S> {
    /// Start from a data source with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: AutocompleteConfig::default(),
            runtime: None,
            text_field: None,
            list_view: None,
            clear_button: None,
        }
    }

    /// The text field to take control of. Required.
    pub fn text_field(mut self, text_field: impl TextField + 'static) -> Self {
        self.text_field = Some(Box::new(text_field));
        self
    }

    /// The list the options are rendered into. Required.
    pub fn list_view(mut self, list_view: impl ListView<S::Value> + 'static) -> Self {
        self.list_view = Some(Box::new(list_view));
        self
    }

    /// An optional clear button.
    pub fn clear_button(mut self, clear_button: impl ClearButton + 'static) -> Self {
        self.clear_button = Some(Box::new(clear_button));
        self
    }

    /// Controller configuration.
    pub fn config(mut self, config: AutocompleteConfig) -> Self {
        self.config = config;
        self
    }

    /// The runtime timers and fetches run on.
    ///
    /// Defaults to the runtime of the context `build` is called from.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the controller.
    ///
    /// Fails if an anchor is missing, the configuration is invalid, or no
    /// runtime is available.
    pub fn build(self) -> Result<Autocomplete<S>> {
        let text_field = self
            .text_field
            .ok_or(AutocompleteError::MissingAnchor(Anchor::Input))?;
        let list_view = self
            .list_view
            .ok_or(AutocompleteError::MissingAnchor(Anchor::OptionList))?;
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|e| CoreError::no_runtime(e.to_string()))?,
        };
        let timer = DebounceTimer::new(runtime.clone(), self.config.debounce)?;

        Ok(Autocomplete {
            inner: Arc::new(Inner {
                source: Arc::new(self.source),
                config: self.config,
                runtime,
                timer,
                text_field,
                list_view,
                clear_button: self.clear_button,
                state: Mutex::new(State::default()),
                value_changed: Signal::new(),
                fetch_failed: Signal::new(),
                highlighted: Signal::new(),
            }),
        })
    }
}

impl<S: DataSource> fmt::Debug for AutocompleteBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteBuilder")
            .field("config", &self.config)
            .field("text_field", &self.text_field.is_some())
            .field("list_view", &self.list_view.is_some())
            .field("clear_button", &self.clear_button.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// State
// ============================================================================

/// The fetch whose result is still wanted.
#[derive(Debug)]
struct PendingFetch {
    id: u64,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct State<V> {
    attached: bool,
    list: OptionList<V>,
    value: Option<V>,
    /// What the text field currently shows.
    input_text: String,
    /// The text the next fetch is issued for.
    query: String,
    /// The debounce arming allowed to issue that fetch.
    scheduled: Option<TimerId>,
    pending: Option<PendingFetch>,
    next_fetch_id: u64,
    clear_visible: bool,
}

impl<V> Default for State<V> {
    fn default() -> Self {
        Self {
            attached: false,
            list: OptionList::new(),
            value: None,
            input_text: String::new(),
            query: String::new(),
            scheduled: None,
            pending: None,
            next_fetch_id: 0,
            clear_visible: false,
        }
    }
}

impl<V> State<V> {
    /// Forget the session, keeping the fetch id counter monotonic.
    fn reset(&mut self) {
        let next_fetch_id = self.next_fetch_id;
        *self = Self::default();
        self.next_fetch_id = next_fetch_id;
    }
}

struct Inner<S: DataSource> {
    source: Arc<S>,
    config: AutocompleteConfig,
    runtime: Handle,
    timer: DebounceTimer,
    text_field: Box<dyn TextField>,
    list_view: Box<dyn ListView<S::Value>>,
    clear_button: Option<Box<dyn ClearButton>>,
    state: Mutex<State<S::Value>>,
    value_changed: Signal<Option<S::Value>>,
    fetch_failed: Signal<FetchFailure>,
    highlighted: Signal<Option<usize>>,
}

impl<S: DataSource> Inner<S> {
    /// Push the list state out to the view.
    fn sync_list(&self, state: &State<S::Value>) {
        let open = state.list.is_open();
        self.list_view
            .render(state.list.options(), state.list.active_index());
        self.list_view.set_visible(open);
        self.text_field.set_expanded(open);
    }

    fn clear_options(&self, state: &mut State<S::Value>) {
        state.list.clear();
        self.sync_list(state);
    }

    fn set_clear_visible(&self, state: &mut State<S::Value>, visible: bool) {
        state.clear_visible = visible;
        if let Some(button) = &self.clear_button {
            button.set_visible(visible);
        }
    }

    /// Invalidate the pending fetch, if any.
    fn cancel_pending(&self, state: &mut State<S::Value>, reason: CancelReason) {
        if let Some(pending) = state.pending.take() {
            pending.cancel.cancel(reason);
            tracing::debug!(target: targets::PIPELINE, id = pending.id, %reason, "pending fetch cancelled");
        }
    }

    /// Commit a value and rebuild the input text from it.
    ///
    /// Returns the value to notify observers with once the lock is released.
    fn commit(
        &self,
        state: &mut State<S::Value>,
        value: Option<S::Value>,
        selected: Option<&AutocompleteOption<S::Value>>,
    ) -> Option<S::Value> {
        self.clear_options(state);

        let text = match &value {
            Some(value) => self
                .source
                .value_to_option(value)
                .map(|option| option.display_text().to_string())
                .or_else(|| selected.map(|option| option.display_text().to_string()))
                .unwrap_or_default(),
            None => String::new(),
        };
        self.text_field.set_text(&text);
        state.input_text = text;
        state.value = value.clone();

        tracing::debug!(
            target: targets::SELECTION,
            committed = value.is_some(),
            text = %state.input_text,
            "value committed"
        );
        value
    }

    /// The clear path shared by the clear action and an emptied input.
    fn clear(&self, state: &mut State<S::Value>) -> Option<S::Value> {
        self.timer.cancel();
        state.scheduled = None;
        self.cancel_pending(state, CancelReason::Cleared);
        state.query.clear();
        let value = self.commit(state, None, None);
        self.set_clear_visible(state, false);
        value
    }

    /// Debounce timer callback: issue a fetch for the latest query.
    #[tracing::instrument(skip_all, target = "autocomplete::pipeline", level = "debug")]
    fn issue_fetch(self: &Arc<Self>, timer_id: TimerId) {
        let (id, query, cancel) = {
            let mut state = self.state.lock();
            if state.scheduled != Some(timer_id) {
                tracing::trace!(target: targets::PIPELINE, timer = timer_id.as_u64(), "ignoring superseded timer");
                return;
            }
            state.scheduled = None;
            if !state.attached || state.query.is_empty() {
                return;
            }
            self.cancel_pending(&mut state, CancelReason::Superseded);

            state.next_fetch_id += 1;
            let id = state.next_fetch_id;
            let cancel = CancellationToken::new();
            state.pending = Some(PendingFetch {
                id,
                cancel: cancel.clone(),
            });
            (id, state.query.clone(), cancel)
        };

        tracing::debug!(target: targets::PIPELINE, id, query = %query, "issuing fetch");

        let guard = FetchGuard {
            inner: Arc::downgrade(self),
            id,
            settled: false,
        };
        let source = self.source.clone();
        self.runtime.spawn(async move {
            let result = source.fetch(query.clone(), cancel.clone()).await;
            if let Some(inner) = guard.settle() {
                inner.complete_fetch(id, query, &cancel, result);
            }
        });
    }

    /// Forget fetch `id` if it is still the pending one.
    fn abandon_fetch(&self, id: u64) {
        let mut state = self.state.lock();
        if state.pending.as_ref().is_some_and(|pending| pending.id == id) {
            state.pending = None;
            tracing::debug!(target: targets::PIPELINE, id, "fetch task ended without a result");
        }
    }

    /// Install a fetch result if its token is still current.
    fn complete_fetch(
        &self,
        id: u64,
        query: String,
        cancel: &CancellationToken,
        result: std::result::Result<Vec<S::Raw>, FetchError>,
    ) {
        let failure = {
            let mut state = self.state.lock();
            let current = state.attached
                && !cancel.is_cancelled()
                && state.pending.as_ref().is_some_and(|pending| pending.id == id);
            if !current {
                tracing::debug!(
                    target: targets::PIPELINE,
                    id,
                    reason = ?cancel.reason(),
                    "discarding stale fetch result"
                );
                return;
            }
            state.pending = None;

            match result {
                Ok(raws) => {
                    let _span = PerfSpan::new("install_candidates");
                    let options: Vec<_> = raws
                        .into_iter()
                        .filter_map(|raw| self.source.to_option(raw))
                        .collect();
                    tracing::debug!(target: targets::LIST, id, count = options.len(), "candidates installed");
                    state.list.set_candidates(options);
                    self.sync_list(&state);
                    None
                }
                Err(error) => {
                    tracing::warn!(target: targets::PIPELINE, id, query = %query, %error, "fetch failed");
                    Some(FetchFailure { query, error })
                }
            }
        };

        if let Some(failure) = failure {
            self.fetch_failed.emit(failure);
        }
    }
}

/// Lives inside a fetch task. If the task panics or is dropped before the
/// fetch resolves, the fetch stops counting as pending.
struct FetchGuard<S: DataSource> {
    inner: Weak<Inner<S>>,
    id: u64,
    settled: bool,
}

impl<S: DataSource> FetchGuard<S> {
    /// The fetch resolved; hand over the controller if it is still alive.
    fn settle(mut self) -> Option<Arc<Inner<S>>> {
        self.settled = true;
        self.inner.upgrade()
    }
}

impl<S: DataSource> Drop for FetchGuard<S> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.abandon_fetch(self.id);
        }
    }
}

impl<S: DataSource> Drop for Inner<S> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(pending) = state.pending.take() {
            pending.cancel.cancel(CancelReason::Teardown);
        }
    }
}

// ============================================================================
// Autocomplete
// ============================================================================

/// An autocomplete controller.
///
/// Cloning yields another handle to the same controller, which is convenient
/// for moving it into host event callbacks. Background work holds only weak
/// references, so dropping the last handle tears the controller down.
///
/// # Signals
///
/// - `value_changed(Option<V>)`: a value was committed (`None` on clear)
/// - `fetch_failed(FetchFailure)`: the current fetch returned an error
/// - `highlighted(Option<usize>)`: keyboard navigation moved the highlight
pub struct Autocomplete<S: DataSource> {
    inner: Arc<Inner<S>>,
}

impl<S: DataSource> Clone for Autocomplete<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: DataSource> Autocomplete<S> {
    /// Start building a controller around a data source.
    pub fn builder(source: S) -> AutocompleteBuilder<S> {
        AutocompleteBuilder::new(source)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start handling events.
    ///
    /// Initializes the anchors and starts from a fresh, empty state.
    pub fn attach(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        if state.attached {
            return Err(AutocompleteError::AlreadyAttached);
        }
        state.reset();
        state.attached = true;

        self.inner.text_field.init_combobox();
        self.inner.set_clear_visible(&mut state, false);
        self.inner.sync_list(&state);

        tracing::debug!(target: targets::LIFECYCLE, "attached");
        Ok(())
    }

    /// Stop handling events and abandon any outstanding work.
    ///
    /// Returns `false` if the controller was not attached.
    pub fn detach(&self) -> bool {
        let mut state = self.inner.state.lock();
        if !state.attached {
            return false;
        }
        self.inner.timer.cancel();
        state.scheduled = None;
        self.inner.cancel_pending(&mut state, CancelReason::Teardown);
        state.attached = false;

        tracing::debug!(target: targets::LIFECYCLE, "detached");
        true
    }

    /// Whether the controller is handling events.
    pub fn is_attached(&self) -> bool {
        self.inner.state.lock().attached
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Handle a change of the input text.
    ///
    /// Any visible candidates are dropped. Empty text clears immediately;
    /// anything else schedules a fetch one quiet period from now.
    pub fn on_input_changed(&self, text: &str) {
        let notify = {
            let mut state = self.inner.state.lock();
            if !state.attached {
                tracing::trace!(target: targets::LIFECYCLE, "input ignored while detached");
                return;
            }
            self.inner.clear_options(&mut state);

            if text.is_empty() {
                Some(self.inner.clear(&mut state))
            } else {
                self.inner.set_clear_visible(&mut state, true);
                state.input_text = text.to_string();
                state.query = text.to_string();
                self.inner
                    .cancel_pending(&mut state, CancelReason::Superseded);

                let weak: Weak<Inner<S>> = Arc::downgrade(&self.inner);
                // Stored while the lock is held, so a firing that raced this
                // re-arm finds a different id and backs off.
                let timer_id = self.inner.timer.arm(move |timer_id| {
                    if let Some(inner) = weak.upgrade() {
                        inner.issue_fetch(timer_id);
                    }
                });
                state.scheduled = Some(timer_id);
                tracing::trace!(target: targets::PIPELINE, timer = timer_id.as_u64(), "fetch scheduled");
                None
            }
        };

        if let Some(value) = notify {
            self.inner.value_changed.emit(value);
        }
    }

    /// Handle a key press.
    ///
    /// Returns [`KeyOutcome::Handled`] when the host should suppress the
    /// key's default action.
    pub fn on_key_down(&self, key: Key) -> KeyOutcome {
        enum After<V> {
            Nothing,
            Highlighted(Option<usize>),
            Committed(Option<V>),
        }

        let (outcome, after) = {
            let mut state = self.inner.state.lock();
            if !state.attached || state.list.is_empty() || !state.list.is_open() {
                return KeyOutcome::Ignored;
            }

            match key {
                Key::ArrowDown | Key::ArrowUp => {
                    let direction = if key == Key::ArrowDown {
                        Direction::Next
                    } else {
                        Direction::Previous
                    };
                    let after = if state.list.move_active(direction) {
                        let active = state.list.active_index();
                        self.inner.list_view.highlight(active);
                        tracing::trace!(target: targets::LIST, ?active, "highlight moved");
                        After::Highlighted(active)
                    } else {
                        After::Nothing
                    };
                    (KeyOutcome::Handled, after)
                }
                Key::Enter => {
                    let confirmed = state.list.confirm().cloned();
                    let after = match confirmed {
                        Some(option) if option.is_selectable() => {
                            let value = option.value.clone();
                            After::Committed(self.inner.commit(&mut state, Some(value), Some(&option)))
                        }
                        _ => After::Nothing,
                    };
                    (KeyOutcome::Handled, after)
                }
                Key::Other => (KeyOutcome::Ignored, After::Nothing),
            }
        };

        match after {
            After::Nothing => {}
            After::Highlighted(active) => self.inner.highlighted.emit(active),
            After::Committed(value) => self.inner.value_changed.emit(value),
        }
        outcome
    }

    /// Handle a pointer press anywhere in the host.
    ///
    /// A press outside the widget dismisses the list; a press inside
    /// reopens it if there is anything to show.
    pub fn on_pointer_down(&self, inside: bool) {
        let mut state = self.inner.state.lock();
        if !state.attached {
            return;
        }
        state.list.set_open(inside);
        self.inner.sync_list(&state);
    }

    /// Handle a click on the option at `index` in the rendered list.
    pub fn on_option_clicked(&self, index: usize) -> bool {
        self.select_index(index)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Commit `option`'s value.
    ///
    /// Disabled options are ignored. Returns `true` if a value was committed.
    pub fn select(&self, option: &AutocompleteOption<S::Value>) -> bool {
        if !option.is_selectable() {
            tracing::trace!(target: targets::SELECTION, "ignoring selection of disabled option");
            return false;
        }
        let value = {
            let mut state = self.inner.state.lock();
            if !state.attached {
                return false;
            }
            self.inner
                .commit(&mut state, Some(option.value.clone()), Some(option))
        };
        self.inner.value_changed.emit(value);
        true
    }

    /// Commit the value of the candidate at `index`.
    ///
    /// Returns `false` if there is no such candidate or it is disabled.
    pub fn select_index(&self, index: usize) -> bool {
        let option = self.inner.state.lock().list.options().get(index).cloned();
        match option {
            Some(option) => self.select(&option),
            None => false,
        }
    }

    /// Clear the input and the committed value.
    ///
    /// Observers are notified with `None` every time, even if nothing was
    /// committed.
    pub fn clear(&self) {
        let value = {
            let mut state = self.inner.state.lock();
            if !state.attached {
                return;
            }
            self.inner.clear(&mut state)
        };
        self.inner.value_changed.emit(value);
    }

    /// Commit a value programmatically.
    pub fn set_value(&self, value: Option<S::Value>) {
        let value = {
            let mut state = self.inner.state.lock();
            if !state.attached {
                return;
            }
            self.inner.commit(&mut state, value, None)
        };
        self.inner.value_changed.emit(value);
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// The committed value.
    pub fn value(&self) -> Option<S::Value> {
        self.inner.state.lock().value.clone()
    }

    /// What the text field shows.
    pub fn input_text(&self) -> String {
        self.inner.state.lock().input_text.clone()
    }

    /// Whether the option list is visible.
    pub fn is_open(&self) -> bool {
        self.inner.state.lock().list.is_open()
    }

    /// The current candidate set.
    pub fn options(&self) -> Arc<[AutocompleteOption<S::Value>]> {
        self.inner.state.lock().list.options().clone()
    }

    /// The highlighted position, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.inner.state.lock().list.active_index()
    }

    /// Whether a fetch has been issued whose result is still wanted.
    pub fn has_pending_fetch(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Whether a fetch is scheduled but not yet issued.
    pub fn is_fetch_scheduled(&self) -> bool {
        self.inner.timer.is_armed()
    }

    /// Whether the clear button should be shown.
    pub fn is_clear_visible(&self) -> bool {
        self.inner.state.lock().clear_visible
    }

    /// The configuration the controller was built with.
    pub fn config(&self) -> &AutocompleteConfig {
        &self.inner.config
    }

    /// The data source.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with the new value every time one is committed.
    pub fn value_changed(&self) -> &Signal<Option<S::Value>> {
        &self.inner.value_changed
    }

    /// Emitted when the current fetch fails.
    pub fn fetch_failed(&self) -> &Signal<FetchFailure> {
        &self.inner.fetch_failed
    }

    /// Emitted when keyboard navigation moves the highlight.
    pub fn highlighted(&self) -> &Signal<Option<usize>> {
        &self.inner.highlighted
    }
}

impl<S: DataSource> fmt::Debug for Autocomplete<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Autocomplete")
            .field("attached", &state.attached)
            .field("options", &state.list.len())
            .field("active_index", &state.list.active_index())
            .field("open", &state.list.is_open())
            .field("committed", &state.value.is_some())
            .field("pending_fetch", &state.pending.as_ref().map(|p| p.id))
            .finish()
    }
}

static_assertions::assert_impl_all!(Autocomplete<crate::source::DefaultSource>: Send, Sync, Clone);
