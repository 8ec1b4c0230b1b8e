//! Error types for page sources

use std::path::PathBuf;

use thiserror::Error;
use uimap_compiler::CompileError;
use uimap_model::PageError;

/// Page source error enumeration
#[derive(Debug, Error)]
pub enum SourceError {
    /// Registry constructed without any source location
    #[error("cannot create page registry without source locations")]
    NoSources,

    /// Configured path unreadable or nonexistent; raised eagerly at
    /// registry construction
    #[error("source location '{}' is not readable: {reason}", path.display())]
    InvalidSourceLocation { path: PathBuf, reason: String },

    /// A UI-map file could not be decoded
    #[error("cannot parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A UI-map file could not be compiled
    #[error("cannot compile '{}': {source}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },

    /// Filesystem failure while scanning or reading sources
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No page registered under the requested key
    #[error("page with key '{key}' is not found")]
    PageNotFound { key: String },

    /// No page's URL pattern matches the requested URL
    #[error("page not found by URL '{url}'")]
    PageNotFoundByUrl { url: String },

    /// Page model failure surfaced during lookup or validation
    #[error(transparent)]
    Page(#[from] PageError),
}

impl SourceError {
    /// True for errors a caller can recover from (report and continue)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SourceError::PageNotFound { .. } | SourceError::PageNotFoundByUrl { .. }
        )
    }
}
