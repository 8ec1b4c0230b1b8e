//! Typed page tree nodes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Node kind enumeration
///
/// One variant per element type a page map can describe. `Page` is the
/// synthetic document root; the leaf kinds map to interactive controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Document root
    Page,

    /// Navigational container (tab strip entry)
    Tab,

    /// Grouping container (form section)
    Fieldset,

    /// Text input / textarea
    Field,

    /// Dropdown or multiselect
    Select,

    /// Clickable button
    Button,

    /// Checkbox or radio button
    Checkbox,

    /// Anchor element
    Link,

    /// Generic page element
    Element,
}

impl NodeKind {
    /// Get kind name as string
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Tab => "tab",
            NodeKind::Fieldset => "fieldset",
            NodeKind::Field => "field",
            NodeKind::Select => "select",
            NodeKind::Button => "button",
            NodeKind::Checkbox => "checkbox",
            NodeKind::Link => "link",
            NodeKind::Element => "element",
        }
    }

    /// True for kinds that may not carry children
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Field
                | NodeKind::Select
                | NodeKind::Button
                | NodeKind::Checkbox
                | NodeKind::Link
                | NodeKind::Element
        )
    }

    /// Containment rules: which child kinds are legal under `self`.
    ///
    /// Tabs live directly under the page, fieldsets under the page or a
    /// tab, leaves anywhere below a container. Nothing nests inside a
    /// leaf, and `Page` never appears below the root.
    pub fn may_contain(&self, child: NodeKind) -> bool {
        match self {
            NodeKind::Page => child != NodeKind::Page,
            NodeKind::Tab => child.is_leaf() || child == NodeKind::Fieldset,
            NodeKind::Fieldset => child.is_leaf(),
            _ => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(NodeKind::Page),
            "tab" => Ok(NodeKind::Tab),
            "fieldset" => Ok(NodeKind::Fieldset),
            "field" => Ok(NodeKind::Field),
            "select" => Ok(NodeKind::Select),
            "button" => Ok(NodeKind::Button),
            "checkbox" => Ok(NodeKind::Checkbox),
            "link" => Ok(NodeKind::Link),
            "element" => Ok(NodeKind::Element),
            other => Err(format!("unknown node kind '{other}'")),
        }
    }
}

/// One node of the compiled page tree.
///
/// Nodes own their children outright; traversal is always top-down and
/// ancestor fragments are accumulated on a path stack, so no parent
/// back-references are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind
    pub kind: NodeKind,

    /// Node key, unique enough to address the node within its scope
    #[serde(default)]
    pub key: String,

    /// XPath fragment combined with ancestor fragments at resolution time
    #[serde(default)]
    pub fragment: String,

    /// Child nodes, insertion order preserved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node of an arbitrary kind
    pub fn new(kind: NodeKind, key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            fragment: fragment.into(),
            children: Vec::new(),
        }
    }

    /// Create the synthetic page root
    pub fn page() -> Self {
        Self::new(NodeKind::Page, "", "")
    }

    /// Create a tab node
    pub fn tab(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Tab, key, fragment)
    }

    /// Create a fieldset node
    pub fn fieldset(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Fieldset, key, fragment)
    }

    /// Create a field node
    pub fn field(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Field, key, fragment)
    }

    /// Create a select node
    pub fn select(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Select, key, fragment)
    }

    /// Create a button node
    pub fn button(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Button, key, fragment)
    }

    /// Create a checkbox node
    pub fn checkbox(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Checkbox, key, fragment)
    }

    /// Create a link node
    pub fn link(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Link, key, fragment)
    }

    /// Create a generic element node
    pub fn element(key: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::new(NodeKind::Element, key, fragment)
    }

    /// Append a child node
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Builder-style child attachment
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}
