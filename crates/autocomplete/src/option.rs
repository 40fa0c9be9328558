//! The option model.
//!
//! An [`AutocompleteOption`] is one selectable entry in the candidate list.
//! Options are identified by their position in the current candidate set,
//! never by comparing values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque, pre-built visual for an option label.
///
/// The controller never looks inside a fragment; it only stores it and hands
/// it back to the list view. Use [`downcast_ref`](Self::downcast_ref) in the
/// view to recover the concrete type.
#[derive(Clone)]
pub struct Fragment(Arc<dyn Any + Send + Sync>);

impl Fragment {
    /// Wrap a visual of any type.
    pub fn new<T: Any + Send + Sync>(visual: T) -> Self {
        Self(Arc::new(visual))
    }

    /// Borrow the wrapped visual as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fragment(..)")
    }
}

/// The label shown for an option.
#[derive(Debug, Clone)]
pub enum Label {
    /// Plain text.
    Text(String),
    /// A visual built by the host; opaque to the controller.
    Fragment(Fragment),
}

impl Label {
    /// The label text, if this is a plain-text label.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Fragment(_) => None,
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Fragment> for Label {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// A selectable entry.
#[derive(Debug, Clone)]
pub struct AutocompleteOption<V> {
    /// What the list shows.
    pub label: Label,
    /// The value committed when this option is selected.
    pub value: V,
    /// Text written into the input on selection, overriding a text label.
    pub input_value: Option<String>,
    /// Disabled options are shown but can never be highlighted or selected.
    pub disabled: bool,
}

impl<V> AutocompleteOption<V> {
    /// Create an enabled option.
    pub fn new(label: impl Into<Label>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
            input_value: None,
            disabled: false,
        }
    }

    /// Set the input text using builder pattern.
    pub fn with_input_value(mut self, input_value: impl Into<String>) -> Self {
        self.input_value = Some(input_value.into());
        self
    }

    /// Mark the option disabled using builder pattern.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set whether the option is disabled.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the option can be selected.
    pub fn is_selectable(&self) -> bool {
        !self.disabled
    }

    /// The text an input shows once this option is committed.
    ///
    /// `input_value` if present, else the label if it is plain text, else
    /// the empty string.
    pub fn display_text(&self) -> &str {
        self.input_value
            .as_deref()
            .or_else(|| self.label.as_text())
            .unwrap_or("")
    }
}

impl From<&str> for AutocompleteOption<String> {
    fn from(text: &str) -> Self {
        Self::new(text, text.to_string())
    }
}

impl From<String> for AutocompleteOption<String> {
    fn from(text: String) -> Self {
        Self::new(text.clone(), text)
    }
}
