//! Validated page document

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::PageError;
use crate::locator::Locator;
use crate::node::{Node, NodeKind};
use crate::resolve;
use crate::urls;

/// Pre-validation document parts: the cacheable intermediate produced by
/// the compiler. Turning parts into a [`PageDocument`] runs structural
/// validation, so a cache hit is re-validated the same way as a fresh
/// compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParts {
    /// Stable page identifier
    pub key: String,

    /// Human-readable title, may carry `%name%` placeholders
    #[serde(default)]
    pub title: String,

    /// URL pattern with `%name%` placeholders; empty never matches
    #[serde(default)]
    pub url: String,

    /// Document root, kind `page`
    pub root: Node,
}

/// One page of a UI map: root attributes plus a validated tree of typed
/// nodes, each carrying an XPath fragment.
///
/// Documents are created once at compile time and immutable afterwards;
/// the URL-matching regex is built lazily and memoized per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "PageParts", try_from = "PageParts")]
pub struct PageDocument {
    key: String,
    title: String,
    url: String,
    root: Node,
    url_regex: OnceCell<Regex>,
}

impl PageDocument {
    /// Build and validate a document
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        root: Node,
    ) -> Result<Self, PageError> {
        let key = key.into();
        validate(&key, &root)?;
        Ok(Self {
            key,
            title: title.into(),
            url: url.into(),
            root,
            url_regex: OnceCell::new(),
        })
    }

    /// The "no page" default: empty key, empty pattern, empty tree
    pub fn empty() -> Self {
        Self {
            key: String::new(),
            title: String::new(),
            url: String::new(),
            root: Node::page(),
            url_regex: OnceCell::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Title with `%name%` placeholders substituted
    pub fn title_with(&self, params: &BTreeMap<String, String>) -> String {
        urls::substitute_params(&self.title, params)
    }

    /// URL pattern with `%name%` placeholders substituted
    pub fn url_with(&self, params: &BTreeMap<String, String>) -> String {
        urls::substitute_params(&self.url, params)
    }

    /// Compiled URL-matching regex, memoized per document
    pub fn url_regex(&self) -> Result<&Regex, PageError> {
        self.url_regex.get_or_try_init(|| {
            urls::build_url_regex(&self.url).map_err(|source| PageError::RegexBuildFailure {
                page: self.key.clone(),
                pattern: self.url.clone(),
                source,
            })
        })
    }

    /// True if the candidate URL corresponds to this page. A document with
    /// an empty pattern never matches.
    pub fn matches_url(&self, url: &str) -> Result<bool, PageError> {
        if self.url.is_empty() {
            return Ok(false);
        }
        let regex = self.url_regex()?;
        Ok(regex.is_match(&urls::normalize_url(url)))
    }

    /// Resolve a locator to one executable XPath expression (§resolve)
    pub fn xpath(&self, locator: &Locator) -> Result<String, PageError> {
        resolve::xpath(self, locator)
    }
}

impl PartialEq for PageDocument {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.title == other.title
            && self.url == other.url
            && self.root == other.root
    }
}

impl Eq for PageDocument {}

impl From<PageDocument> for PageParts {
    fn from(doc: PageDocument) -> Self {
        PageParts {
            key: doc.key,
            title: doc.title,
            url: doc.url,
            root: doc.root,
        }
    }
}

impl TryFrom<PageParts> for PageDocument {
    type Error = PageError;

    fn try_from(parts: PageParts) -> Result<Self, Self::Error> {
        PageDocument::new(parts.key, parts.title, parts.url, parts.root)
    }
}

/// Structural validation: root is a `page` node, tabs only under the page,
/// fieldsets only under the page or a tab, leaves childless, no nested
/// page nodes, every non-root node keyed.
fn validate(page_key: &str, root: &Node) -> Result<(), PageError> {
    if root.kind != NodeKind::Page {
        return Err(invalid(
            page_key,
            format!("document root must be a page node, found <{}>", root.kind),
        ));
    }
    validate_children(page_key, root)
}

fn validate_children(page_key: &str, parent: &Node) -> Result<(), PageError> {
    for child in &parent.children {
        if !parent.kind.may_contain(child.kind) {
            return Err(invalid(
                page_key,
                format!("<{}> is not allowed inside <{}>", child.kind, parent.kind),
            ));
        }
        if child.key.is_empty() {
            return Err(invalid(
                page_key,
                format!("<{}> inside <{}> has no key", child.kind, parent.kind),
            ));
        }
        validate_children(page_key, child)?;
    }
    Ok(())
}

fn invalid(page_key: &str, reason: String) -> PageError {
    PageError::InvalidPageDefinition {
        page: page_key.to_string(),
        reason,
    }
}
