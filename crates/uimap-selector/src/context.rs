//! Request-time page context

use std::sync::Arc;

use tracing::debug;

use uimap_model::{Locator, PageDocument};
use uimap_source::PageSource;

use crate::errors::SelectorError;

/// Tracks which page the surrounding session is on.
///
/// A page can be designated explicitly (`load_page`) — its key then rides
/// on every composed locator and wins over URL matching. Navigation
/// invalidates the designation (`reset`), after which locators fall back
/// to resolving the ambient session URL at call time.
#[derive(Default)]
pub struct PageContext {
    current: Option<Arc<PageDocument>>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate the current page explicitly, validating it exists
    pub fn load_page(
        &mut self,
        source: &dyn PageSource,
        key: &str,
    ) -> Result<Arc<PageDocument>, SelectorError> {
        let page = source.page_by_key(key)?;
        debug!("current page set to '{}'", page.key());
        self.current = Some(page.clone());
        Ok(page)
    }

    /// Drop the explicit designation (call after navigation)
    pub fn reset(&mut self) {
        if let Some(page) = self.current.take() {
            debug!("current page '{}' reset", page.key());
        }
    }

    /// Explicitly designated page, if any
    pub fn current(&self) -> Option<&PageDocument> {
        self.current.as_deref()
    }

    /// Compose a locator for the current page: carries the ambient session
    /// URL when known and the explicitly-loaded page key when one is set.
    /// Element scope and parameters are chained onto the result.
    pub fn locator(&self, current_url: Option<&str>) -> Locator {
        let mut locator = Locator::new();
        if let Some(url) = current_url {
            locator = locator.with_page_url(url);
        }
        if let Some(page) = &self.current {
            locator = locator.with_page_key(page.key());
        }
        locator
    }
}
