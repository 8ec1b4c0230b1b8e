//! Error types for UI-map compilation

use thiserror::Error;
use uimap_model::PageError;

/// Compilation error enumeration
#[derive(Debug, Error)]
pub enum CompileError {
    /// Unrecognized section name under strict mode
    #[error("'{section}' element is not supported (page '{page}')")]
    SchemaViolation { page: String, section: String },

    /// A leaf entry whose value is not a scalar string
    #[error(
        "XPath of {section} entry '{name}' on page '{page}' should be a string, {found} given"
    )]
    BadFragment {
        page: String,
        section: String,
        name: String,
        found: &'static str,
    },

    /// A description whose overall shape cannot be compiled
    #[error("invalid description of page '{page}': {reason}")]
    BadStructure { page: String, reason: String },

    /// Built tree failed structural validation
    #[error(transparent)]
    InvalidPage(#[from] PageError),
}

impl CompileError {
    /// Page key the error refers to
    pub fn page(&self) -> &str {
        match self {
            CompileError::SchemaViolation { page, .. }
            | CompileError::BadFragment { page, .. }
            | CompileError::BadStructure { page, .. } => page,
            CompileError::InvalidPage(err) => err.page(),
        }
    }
}
