//! UI-map compiler.
//!
//! Transforms loosely-typed nested mappings (parsed from declarative YAML
//! page maps) into validated [`uimap_model::PageDocument`] trees. The
//! recognized section vocabulary, the per-section construction rules and
//! the strict/lenient policy for unknown sections live here.

pub mod compiler;
pub mod errors;

pub use compiler::UimapCompiler;
pub use errors::CompileError;
