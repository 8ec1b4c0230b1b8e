//! UI-map selector.
//!
//! The request-time facade over a [`uimap_source::PageSource`]: pick the
//! page a [`uimap_model::Locator`] refers to (explicit key first, ambient
//! URL second) and translate the locator into one executable XPath
//! expression. [`PageContext`] tracks the explicitly-loaded current page
//! between requests.

pub mod context;
pub mod errors;
pub mod selector;

pub use context::PageContext;
pub use errors::SelectorError;
pub use selector::UimapSelector;
