//! Locator-to-XPath translation

use std::sync::Arc;

use tracing::debug;

use uimap_model::{Locator, PageDocument};
use uimap_source::PageSource;

use crate::errors::SelectorError;

/// Translates locators to XPath queries using UI maps.
///
/// The produced string is handed uninterpreted to whatever executes
/// queries against the live page; this type never touches a DOM.
pub struct UimapSelector {
    source: Arc<dyn PageSource>,
}

impl UimapSelector {
    /// Create a selector over a page source
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Pick the page the locator refers to: the explicit page key wins
    /// over the ambient page URL when both are present.
    pub fn page_for(&self, locator: &Locator) -> Result<Arc<PageDocument>, SelectorError> {
        if let Some(key) = locator.page_key() {
            Ok(self.source.page_by_key(key)?)
        } else if let Some(url) = locator.page_url() {
            Ok(self.source.page_by_url(url)?)
        } else {
            Err(SelectorError::NoPageReference {
                locator: locator.to_string(),
            })
        }
    }

    /// Translate a locator to an XPath expression
    pub fn to_xpath(&self, locator: &Locator) -> Result<String, SelectorError> {
        let page = self.page_for(locator)?;
        let xpath = page.xpath(locator)?;
        debug!("translated {} to '{}' on page '{}'", locator, xpath, page.key());
        Ok(xpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uimap_model::{Node, NodeKind};
    use uimap_source::SourceError;

    /// Fixed-page source stub
    struct StubSource {
        pages: Vec<Arc<PageDocument>>,
    }

    impl StubSource {
        fn new() -> Self {
            let by_key = PageDocument::new(
                "login",
                "Log in",
                "admin/login/",
                Node::page().with_children(vec![Node::field("username", "//input[@id='username']")]),
            )
            .unwrap();
            let by_url = PageDocument::new(
                "dashboard",
                "Dashboard",
                "admin/dashboard/",
                Node::page().with_children(vec![Node::link("logout", "//a[@id='logout']")]),
            )
            .unwrap();
            Self {
                pages: vec![Arc::new(by_key), Arc::new(by_url)],
            }
        }
    }

    impl PageSource for StubSource {
        fn page_by_key(&self, key: &str) -> Result<Arc<PageDocument>, SourceError> {
            self.pages
                .iter()
                .find(|p| p.key() == key)
                .cloned()
                .ok_or_else(|| SourceError::PageNotFound {
                    key: key.to_string(),
                })
        }

        fn page_by_url(&self, url: &str) -> Result<Arc<PageDocument>, SourceError> {
            for page in &self.pages {
                if page.matches_url(url)? {
                    return Ok(page.clone());
                }
            }
            Err(SourceError::PageNotFoundByUrl {
                url: url.to_string(),
            })
        }
    }

    fn selector() -> UimapSelector {
        UimapSelector::new(Arc::new(StubSource::new()))
    }

    #[test]
    fn page_key_takes_priority_over_page_url() {
        let locator = Locator::for_page_url("http://host/admin/dashboard/")
            .with_page_key("login")
            .with_key("username");
        let xpath = selector().to_xpath(&locator).unwrap();
        assert_eq!(xpath, "//input[@id='username']");
    }

    #[test]
    fn page_url_is_used_when_no_key_is_loaded() {
        let locator = Locator::for_page_url("http://host/admin/dashboard/")
            .with_key("logout")
            .with_kind(NodeKind::Link);
        let xpath = selector().to_xpath(&locator).unwrap();
        assert_eq!(xpath, "//a[@id='logout']");
    }

    #[test]
    fn locator_without_page_reference_fails() {
        let err = selector()
            .to_xpath(&Locator::new().with_key("username"))
            .unwrap_err();
        assert!(matches!(err, SelectorError::NoPageReference { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn unknown_page_key_surfaces_source_error() {
        let err = selector()
            .to_xpath(&Locator::for_page_key("nope").with_key("username"))
            .unwrap_err();
        assert!(matches!(
            err,
            SelectorError::Source(SourceError::PageNotFound { .. })
        ));
    }

    #[test]
    fn unresolvable_element_surfaces_page_error() {
        let err = selector()
            .to_xpath(&Locator::for_page_key("login").with_key("missing"))
            .unwrap_err();
        assert!(matches!(err, SelectorError::Page(_)));
        let rendered = err.to_string();
        assert!(rendered.contains("page_key:login"));
        assert!(rendered.contains("'login'"));
    }
}
