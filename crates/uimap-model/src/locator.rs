//! Locator value object

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// Immutable tuple describing *what to find*: a page reference (by key
/// and/or URL), an element key and kind, optional fieldset and tab scope,
/// and `%name%` parameter substitutions.
///
/// Both page fields may be present at once — a request-time context
/// usually knows the ambient session URL and sometimes also an explicitly
/// loaded page key. The key takes priority at selection time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    page_key: Option<String>,
    page_url: Option<String>,
    key: Option<String>,
    kind: Option<NodeKind>,
    fieldset: Option<String>,
    tab: Option<String>,
    parameters: BTreeMap<String, String>,
}

impl Locator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator referencing a page by key
    pub fn for_page_key(page_key: impl Into<String>) -> Self {
        Self {
            page_key: Some(page_key.into()),
            ..Self::default()
        }
    }

    /// Create a locator referencing a page by URL
    pub fn for_page_url(page_url: impl Into<String>) -> Self {
        Self {
            page_url: Some(page_url.into()),
            ..Self::default()
        }
    }

    /// Set the page key reference
    pub fn with_page_key(mut self, page_key: impl Into<String>) -> Self {
        self.page_key = Some(page_key.into());
        self
    }

    /// Set the page URL reference
    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = Some(page_url.into());
        self
    }

    /// Set the element key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the element kind; absent kind is a wildcard
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Scope the search to a fieldset
    pub fn with_fieldset(mut self, fieldset: impl Into<String>) -> Self {
        self.fieldset = Some(fieldset.into());
        self
    }

    /// Scope the search to a tab
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    /// Add one substitution parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Merge a parameter map
    pub fn with_parameters(mut self, params: BTreeMap<String, String>) -> Self {
        self.parameters.extend(params);
        self
    }

    pub fn page_key(&self) -> Option<&str> {
        self.page_key.as_deref()
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    pub fn fieldset(&self) -> Option<&str> {
        self.fieldset.as_deref()
    }

    pub fn tab(&self) -> Option<&str> {
        self.tab.as_deref()
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn has_page_key(&self) -> bool {
        self.page_key.is_some()
    }

    pub fn has_page_url(&self) -> bool {
        self.page_url.is_some()
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    pub fn has_kind(&self) -> bool {
        self.kind.is_some()
    }

    pub fn has_fieldset(&self) -> bool {
        self.fieldset.is_some()
    }

    pub fn has_tab(&self) -> bool {
        self.tab.is_some()
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// Canonical diagnostic rendering: only present fields, fixed order,
/// parameters sorted by name. Used in error messages and tests, not for
/// identity.
impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        if let Some(v) = &self.page_key {
            if !v.is_empty() {
                s.push_str(&format!("page_key:{v};"));
            }
        }
        if let Some(v) = &self.page_url {
            if !v.is_empty() {
                s.push_str(&format!("page_url:{v};"));
            }
        }
        if let Some(v) = &self.key {
            if !v.is_empty() {
                s.push_str(&format!("key:{v};"));
            }
        }
        if let Some(kind) = self.kind {
            s.push_str(&format!("type:{kind};"));
        }
        if let Some(v) = &self.fieldset {
            if !v.is_empty() {
                s.push_str(&format!("fieldset:{v};"));
            }
        }
        if let Some(v) = &self.tab {
            if !v.is_empty() {
                s.push_str(&format!("tab:{v};"));
            }
        }
        if !self.parameters.is_empty() {
            let p = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(";");
            s.push_str(&format!("parameters:<{p}>;"));
        }
        write!(f, "<{}>", s.trim_end_matches(';'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_present_fields_in_fixed_order() {
        let locator = Locator::for_page_key("edit_product")
            .with_key("general_name")
            .with_kind(NodeKind::Field)
            .with_fieldset("product_general")
            .with_tab("general");
        assert_eq!(
            locator.to_string(),
            "<page_key:edit_product;key:general_name;type:field;\
             fieldset:product_general;tab:general>"
        );
    }

    #[test]
    fn display_renders_parameters_sorted_by_name() {
        let locator = Locator::new()
            .with_key("row")
            .with_parameter("z", "1")
            .with_parameter("a", "2");
        assert_eq!(locator.to_string(), "<key:row;parameters:<a:2;z:1>>");
    }

    #[test]
    fn display_of_empty_locator() {
        assert_eq!(Locator::new().to_string(), "<>");
    }

    #[test]
    fn predicates_track_presence() {
        let locator = Locator::for_page_url("http://host/admin/").with_tab("general");
        assert!(locator.has_page_url());
        assert!(locator.has_tab());
        assert!(!locator.has_page_key());
        assert!(!locator.has_key());
        assert!(!locator.has_kind());
        assert!(!locator.has_fieldset());
        assert!(!locator.has_parameters());
    }

    #[test]
    fn both_page_references_may_coexist() {
        let locator = Locator::for_page_url("http://host/x").with_page_key("manage_products");
        assert!(locator.has_page_key() && locator.has_page_url());
    }
}
