//! A toolkit-agnostic autocomplete (combobox) controller.
//!
//! The controller turns keystrokes into debounced, cancellable fetches against
//! a pluggable [`DataSource`], keeps the candidate list and its highlight, and
//! commits the chosen value back to the text field. Drawing is left to the
//! host through the [`TextField`], [`ListView`] and [`ClearButton`] traits.
//!
//! # Modules
//!
//! - [`option`]: [`AutocompleteOption`] and its [`Label`]
//! - [`source`]: the [`DataSource`] trait and ready-made sources
//! - [`list`]: candidate set, highlight and open state
//! - [`navigation`]: arrow-key movement rules
//! - [`view`]: host collaborators and key events
//! - [`config`]: [`AutocompleteConfig`], loadable from TOML
//!
//! # Example
//!
//! ```
//! use autocomplete::{AutocompleteOption, Direction, OptionList};
//!
//! let mut list = OptionList::new();
//! list.set_candidates(vec![
//!     AutocompleteOption::new("Apple", 1),
//!     AutocompleteOption::new("Banana", 2).disabled(),
//!     AutocompleteOption::new("Cherry", 3),
//! ]);
//!
//! list.move_active(Direction::Next);
//! list.move_active(Direction::Next);
//! assert_eq!(list.confirm().map(|o| o.value), Some(3));
//! ```

pub mod config;
mod controller;
mod error;
pub mod list;
pub mod navigation;
pub mod option;
pub mod source;
pub mod view;

pub use autocomplete_core::{CancelReason, CancellationToken, ConnectionId, Signal};
pub use config::AutocompleteConfig;
pub use controller::{Autocomplete, AutocompleteBuilder};
pub use error::{Anchor, AutocompleteError, FetchError, FetchFailure, Result};
pub use list::OptionList;
pub use navigation::{Direction, step};
pub use option::{AutocompleteOption, Fragment, Label};
pub use source::{DataSource, DefaultSource, FnSource, string_option};
pub use view::{ClearButton, Key, KeyOutcome, ListView, TextField};
