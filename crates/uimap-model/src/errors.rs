//! Error types for the page-map model

use thiserror::Error;

/// Page model error enumeration
#[derive(Debug, Error, Clone)]
pub enum PageError {
    /// Document failed structural validation
    #[error("invalid definition of page '{page}': {reason}")]
    InvalidPageDefinition { page: String, reason: String },

    /// No node satisfies the locator path
    #[error("cannot find XPath by {locator} on page '{page}'")]
    ElementNotFound { locator: String, page: String },

    /// URL-pattern-to-regex compilation failed
    #[error("cannot build URL regex from pattern '{pattern}' of page '{page}': {source}")]
    RegexBuildFailure {
        page: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl PageError {
    /// Page key the error refers to
    pub fn page(&self) -> &str {
        match self {
            PageError::InvalidPageDefinition { page, .. }
            | PageError::ElementNotFound { page, .. }
            | PageError::RegexBuildFailure { page, .. } => page,
        }
    }

    /// True for errors a caller can recover from (report and continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PageError::ElementNotFound { .. })
    }
}
