//! Host-side collaborators and input types.
//!
//! The controller never draws anything. It pushes state out to these traits
//! and receives keyboard/pointer events through the controller's `on_*`
//! methods. Implementations are called while controller state is locked and
//! must not call back into the controller synchronously; route clicks back
//! through [`Autocomplete::on_option_clicked`](crate::Autocomplete::on_option_clicked)
//! from the host's own event handling instead.

use std::sync::Arc;

use crate::option::AutocompleteOption;

/// The text field the controller drives.
pub trait TextField: Send + Sync {
    /// Set up combobox semantics (role, expanded state, no native
    /// autocomplete). Called on attach.
    fn init_combobox(&self) {}

    /// Replace the displayed text.
    fn set_text(&self, text: &str);

    /// Reflect whether the option list is expanded.
    fn set_expanded(&self, expanded: bool);
}

/// The list the options are rendered into.
pub trait ListView<V>: Send + Sync {
    /// Full render of the candidate set with the given highlight.
    fn render(&self, options: &[AutocompleteOption<V>], active: Option<usize>);

    /// Highlight-only update after keyboard navigation.
    ///
    /// The candidate set is unchanged since the last [`render`](Self::render);
    /// views should also scroll the active item into view here.
    fn highlight(&self, active: Option<usize>);

    /// Show or hide the list.
    fn set_visible(&self, visible: bool);
}

/// An optional button that clears the input.
pub trait ClearButton: Send + Sync {
    /// Show or hide the button.
    fn set_visible(&self, visible: bool);
}

impl<T: TextField + ?Sized> TextField for Arc<T> {
    fn init_combobox(&self) {
        (**self).init_combobox();
    }

    fn set_text(&self, text: &str) {
        (**self).set_text(text);
    }

    fn set_expanded(&self, expanded: bool) {
        (**self).set_expanded(expanded);
    }
}

impl<V, T: ListView<V> + ?Sized> ListView<V> for Arc<T> {
    fn render(&self, options: &[AutocompleteOption<V>], active: Option<usize>) {
        (**self).render(options, active);
    }

    fn highlight(&self, active: Option<usize>) {
        (**self).highlight(active);
    }

    fn set_visible(&self, visible: bool) {
        (**self).set_visible(visible);
    }
}

impl<T: ClearButton + ?Sized> ClearButton for Arc<T> {
    fn set_visible(&self, visible: bool) {
        (**self).set_visible(visible);
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move the highlight down.
    ArrowDown,
    /// Move the highlight up.
    ArrowUp,
    /// Select the highlighted option.
    Enter,
    /// Anything else; passed through untouched.
    Other,
}

/// Whether the controller consumed a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; the host should suppress the key's default action.
    Handled,
    /// Not consumed.
    Ignored,
}

impl KeyOutcome {
    /// Whether the key was consumed.
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}
