//! Option list state.
//!
//! [`OptionList`] owns the candidate set, the active (highlighted) index and
//! the open request. Whether the list is actually open is derived: it is open
//! only while open was requested *and* there is something to show.

use std::sync::Arc;

use crate::navigation::{self, Direction};
use crate::option::AutocompleteOption;

fn no_options<V>() -> Arc<[AutocompleteOption<V>]> {
    Arc::from(Vec::<AutocompleteOption<V>>::new())
}

/// The candidate set together with highlight and visibility.
#[derive(Debug, Clone)]
pub struct OptionList<V> {
    options: Arc<[AutocompleteOption<V>]>,
    active: Option<usize>,
    open_requested: bool,
}

impl<V> Default for OptionList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OptionList<V> {
    /// Create an empty, closed list.
    pub fn new() -> Self {
        Self {
            options: no_options(),
            active: None,
            open_requested: false,
        }
    }

    /// The current candidate set.
    pub fn options(&self) -> &Arc<[AutocompleteOption<V>]> {
        &self.options
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The highlighted position, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The highlighted option, if any.
    pub fn active_option(&self) -> Option<&AutocompleteOption<V>> {
        self.active.and_then(|index| self.options.get(index))
    }

    /// Whether the list is visible.
    pub fn is_open(&self) -> bool {
        self.open_requested && !self.options.is_empty()
    }

    /// Replace the candidate set wholesale.
    ///
    /// Clears the highlight and opens the list iff there are candidates.
    pub fn set_candidates(&mut self, options: impl Into<Arc<[AutocompleteOption<V>]>>) {
        self.options = options.into();
        self.active = None;
        self.open_requested = !self.options.is_empty();
    }

    /// Empty the candidate set and close the list.
    pub fn clear(&mut self) {
        self.options = no_options();
        self.active = None;
        self.open_requested = false;
    }

    /// Request the list open or closed.
    ///
    /// An empty list stays closed regardless.
    pub fn set_open(&mut self, open: bool) {
        self.open_requested = open;
    }

    /// Move the highlight one step.
    ///
    /// Does nothing while the list is closed. Returns `true` if the active
    /// index changed.
    pub fn move_active(&mut self, direction: Direction) -> bool {
        if !self.is_open() {
            return false;
        }
        let next = navigation::step(&self.options, self.active, direction);
        let changed = next != self.active;
        self.active = next;
        changed
    }

    /// The option a confirm key would select, without changing state.
    pub fn confirm(&self) -> Option<&AutocompleteOption<V>> {
        self.active_option()
    }
}
