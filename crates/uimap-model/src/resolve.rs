//! Locator resolution: structural query over the page tree with ancestor
//! fragment accumulation and parameter substitution.
//!
//! The constraint chain nests strictly: tab (when present) -> fieldset
//! (beneath the tab match, else anywhere) -> keyed element beneath the
//! most specific present ancestor constraint. Every node that satisfies
//! the full chain contributes the fragments of its ancestor-or-self path;
//! a tree node contributes at most once across all matches and emission
//! follows document order, so repeated structural matches accumulate into
//! one combined expression.

use std::collections::HashSet;

use crate::document::PageDocument;
use crate::errors::PageError;
use crate::locator::Locator;
use crate::node::{Node, NodeKind};
use crate::urls::substitute_params;

/// Resolve `locator` against `document`, producing one XPath expression.
pub(crate) fn xpath(document: &PageDocument, locator: &Locator) -> Result<String, PageError> {
    let mut walk = Walk {
        locator,
        chain: Vec::new(),
        next_id: 0,
        emitted: HashSet::new(),
        out: String::new(),
        found: false,
    };
    walk.visit(document.root(), !locator.has_tab(), !locator.has_fieldset());

    if !walk.found {
        return Err(PageError::ElementNotFound {
            locator: locator.to_string(),
            page: document.key().to_string(),
        });
    }

    Ok(substitute_params(&walk.out, locator.parameters()))
}

struct Walk<'a> {
    locator: &'a Locator,
    /// Ancestor-or-self path of the current node: (preorder id, fragment)
    chain: Vec<(usize, &'a str)>,
    next_id: usize,
    /// Preorder ids whose fragment was already emitted
    emitted: HashSet<usize>,
    out: String,
    found: bool,
}

impl<'a> Walk<'a> {
    /// Depth-first, document-order visit. `in_tab` / `in_fieldset` say
    /// whether the strict ancestors of `node` already satisfy the tab /
    /// fieldset constraints (vacuously true when the locator has none).
    fn visit(&mut self, node: &'a Node, in_tab: bool, in_fieldset: bool) {
        let id = self.next_id;
        self.next_id += 1;
        self.chain.push((id, node.fragment.as_str()));

        if self.is_terminal(node, in_tab, in_fieldset) {
            self.found = true;
            let Walk {
                chain,
                emitted,
                out,
                ..
            } = self;
            for (id, fragment) in chain.iter() {
                if emitted.insert(*id) {
                    out.push_str(fragment);
                }
            }
        }

        let child_in_tab = in_tab
            || self
                .locator
                .tab()
                .is_some_and(|tab| node.kind == NodeKind::Tab && node.key == tab);
        let child_in_fieldset = in_fieldset
            || self.locator.fieldset().is_some_and(|fieldset| {
                node.kind == NodeKind::Fieldset && node.key == fieldset && in_tab
            });

        for child in &node.children {
            self.visit(child, child_in_tab, child_in_fieldset);
        }
        self.chain.pop();
    }

    /// Does `node` satisfy the most specific constraint of the chain?
    fn is_terminal(&self, node: &Node, in_tab: bool, in_fieldset: bool) -> bool {
        if let Some(key) = self.locator.key() {
            node.kind != NodeKind::Page
                && node.key == key
                && self.locator.kind().map_or(true, |kind| node.kind == kind)
                && if self.locator.has_fieldset() {
                    in_fieldset
                } else if self.locator.has_tab() {
                    in_tab
                } else {
                    true
                }
        } else if let Some(fieldset) = self.locator.fieldset() {
            node.kind == NodeKind::Fieldset && node.key == fieldset && in_tab
        } else if let Some(tab) = self.locator.tab() {
            node.kind == NodeKind::Tab && node.key == tab
        } else {
            false
        }
    }
}
