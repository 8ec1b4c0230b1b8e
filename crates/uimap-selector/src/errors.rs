//! Error types for the selector layer

use thiserror::Error;
use uimap_model::PageError;
use uimap_source::SourceError;

/// Selector error enumeration
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Page lookup failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Locator resolution failed on the page
    #[error(transparent)]
    Page(#[from] PageError),

    /// Locator carries neither a page key nor a page URL
    #[error("locator {locator} carries no page key or URL")]
    NoPageReference { locator: String },
}

impl SelectorError {
    /// True for errors a caller can recover from (report and continue)
    pub fn is_recoverable(&self) -> bool {
        match self {
            SelectorError::Source(err) => err.is_recoverable(),
            SelectorError::Page(err) => err.is_recoverable(),
            SelectorError::NoPageReference { .. } => true,
        }
    }
}
