//! Page-map document model.
//!
//! A page map describes the interactive elements of one web page as a tree
//! of typed nodes (tabs, fieldsets, fields, selects, buttons, checkboxes,
//! links, generic elements), each carrying an XPath fragment. This crate
//! owns:
//! - the validated [`PageDocument`] tree and its structural rules
//! - the [`Locator`] value object that names an element within a page
//! - URL-pattern matching with `%name%` placeholders
//! - locator resolution: structural query + ancestor fragment accumulation
//!   + parameter substitution, producing one executable XPath string

pub mod document;
pub mod errors;
pub mod locator;
pub mod node;
pub mod resolve;
pub mod urls;

pub use document::{PageDocument, PageParts};
pub use errors::PageError;
pub use locator::Locator;
pub use node::{Node, NodeKind};
pub use urls::substitute_params;
