//! Recursive description-to-tree compiler

use serde_yaml::Value;
use tracing::debug;

use uimap_model::{Node, NodeKind, PageDocument, PageParts};

use crate::errors::CompileError;

/// Compiles page descriptions into validated documents.
///
/// In strict mode (the default) an unrecognized section name fails the
/// page's compilation; in lenient mode it is skipped and the remaining
/// sections are still processed.
#[derive(Debug, Clone)]
pub struct UimapCompiler {
    strict: bool,
}

impl Default for UimapCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl UimapCompiler {
    /// Create a strict-mode compiler
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// Create a lenient-mode compiler
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Compile one page description into a validated document
    pub fn compile(&self, key: &str, description: &Value) -> Result<PageDocument, CompileError> {
        let parts = self.compile_parts(key, description)?;
        Ok(PageDocument::try_from(parts)?)
    }

    /// Compile one page description into pre-validation parts.
    ///
    /// This is the cacheable intermediate; callers that persist it must
    /// re-validate via `PageDocument::try_from` after any cache hit.
    pub fn compile_parts(&self, key: &str, description: &Value) -> Result<PageParts, CompileError> {
        if description.as_mapping().is_none() {
            return Err(CompileError::BadStructure {
                page: key.to_string(),
                reason: format!(
                    "page description should be a mapping, {} given",
                    value_kind(description)
                ),
            });
        }

        let url = self.scalar_field(key, description, "mca")?.unwrap_or_default();
        let title = self.scalar_field(key, description, "title")?.unwrap_or_default();

        let mut root = Node::page();
        if let Some(uimap) = description.get("uimap") {
            if let Some(sections) = uimap.as_mapping() {
                for (name, body) in sections {
                    if !is_arraylike(body) {
                        continue;
                    }
                    match name.as_str() {
                        Some(name) => {
                            self.build_section(key, &mut root.children, name, body)?
                        }
                        None => self.unknown_section(key, &format!("{name:?}"))?,
                    }
                }
            }
        }

        debug!("compiled page '{}' ({} root nodes)", key, root.children.len());
        Ok(PageParts {
            key: key.to_string(),
            title,
            url,
            root,
        })
    }

    /// Compile every page of a key -> description mapping, in document order
    pub fn compile_all(&self, descriptions: &Value) -> Result<Vec<PageDocument>, CompileError> {
        self.compile_all_parts(descriptions)?
            .into_iter()
            .map(|parts| PageDocument::try_from(parts).map_err(CompileError::from))
            .collect()
    }

    /// Pre-validation variant of [`compile_all`](Self::compile_all)
    pub fn compile_all_parts(&self, descriptions: &Value) -> Result<Vec<PageParts>, CompileError> {
        let Some(pages) = descriptions.as_mapping() else {
            return Err(CompileError::BadStructure {
                page: String::new(),
                reason: format!(
                    "top-level document should map page keys to descriptions, {} given",
                    value_kind(descriptions)
                ),
            });
        };

        let mut out = Vec::with_capacity(pages.len());
        for (key, description) in pages {
            let key = match key {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(CompileError::BadStructure {
                        page: String::new(),
                        reason: format!("page key should be a string, {} given", value_kind(other)),
                    })
                }
            };
            out.push(self.compile_parts(&key, description)?);
        }
        Ok(out)
    }

    /// Dispatch one section body against its parent's child list
    fn build_section(
        &self,
        page: &str,
        parent: &mut Vec<Node>,
        section: &str,
        body: &Value,
    ) -> Result<(), CompileError> {
        match section {
            // form is transparent: its entries are sections of the same parent
            "form" => {
                let Some(entries) = body.as_mapping() else {
                    return Err(self.bad_structure(page, "'form' body should be a mapping"));
                };
                for (name, sub) in entries {
                    if !is_arraylike(sub) {
                        continue;
                    }
                    match name.as_str() {
                        Some(name) => self.build_section(page, parent, name, sub)?,
                        None => self.unknown_section(page, &format!("{name:?}"))?,
                    }
                }
                Ok(())
            }

            "tabs" => self.build_containers(page, parent, section, body, NodeKind::Tab),
            "fieldsets" => self.build_containers(page, parent, section, body, NodeKind::Fieldset),

            "fields" => self.build_leaves(page, parent, section, body, NodeKind::Field),
            "dropdowns" | "multiselects" => {
                self.build_leaves(page, parent, section, body, NodeKind::Select)
            }
            "buttons" => self.build_leaves(page, parent, section, body, NodeKind::Button),
            "checkboxes" | "radiobuttons" => {
                self.build_leaves(page, parent, section, body, NodeKind::Checkbox)
            }
            "pageelements" => self.build_leaves(page, parent, section, body, NodeKind::Element),
            "links" => self.build_leaves(page, parent, section, body, NodeKind::Link),

            // recognized but not represented in the document model
            "messages" | "required" => Ok(()),

            other => self.unknown_section(page, other),
        }
    }

    /// Build `tabs` / `fieldsets` container sections.
    ///
    /// A sequence body, or a numeric entry name, is a one-level list
    /// wrapping in the source; it is unwrapped and reprocessed as the same
    /// section. This compensates for an upstream data quirk and is kept
    /// for compatibility.
    fn build_containers(
        &self,
        page: &str,
        parent: &mut Vec<Node>,
        section: &str,
        body: &Value,
        kind: NodeKind,
    ) -> Result<(), CompileError> {
        match body {
            Value::Sequence(items) => {
                for item in items {
                    if item.is_null() {
                        continue;
                    }
                    self.build_containers(page, parent, section, item, kind)?;
                }
                Ok(())
            }
            Value::Mapping(entries) => {
                for (name, description) in entries {
                    if description.is_null() {
                        continue;
                    }
                    match name {
                        // list wrapping expressed as explicit numeric keys
                        Value::Number(_) => {
                            self.build_containers(page, parent, section, description, kind)?;
                        }
                        Value::String(name) => {
                            self.build_container(page, parent, section, name, description, kind)?;
                        }
                        other => {
                            return Err(self.bad_structure(
                                page,
                                &format!(
                                    "name of {section} entry should be a string, {} given",
                                    value_kind(other)
                                ),
                            ))
                        }
                    }
                }
                Ok(())
            }
            other => Err(self.bad_structure(
                page,
                &format!("'{section}' body should be a mapping, {} given", value_kind(other)),
            )),
        }
    }

    fn build_container(
        &self,
        page: &str,
        parent: &mut Vec<Node>,
        section: &str,
        name: &str,
        description: &Value,
        kind: NodeKind,
    ) -> Result<(), CompileError> {
        let Some(entries) = description.as_mapping() else {
            if self.strict {
                return Err(self.bad_structure(
                    page,
                    &format!(
                        "description of {section} '{name}' should be a mapping, {} given",
                        value_kind(description)
                    ),
                ));
            }
            debug!("skipping malformed {} '{}' on page '{}'", section, name, page);
            return Ok(());
        };

        let xpath = match description.get("xpath") {
            Some(Value::String(s)) => Some(s.as_str()),
            None | Some(Value::Null) => None,
            // array-valued xpath falls through to section recursion below
            Some(Value::Mapping(_)) | Some(Value::Sequence(_)) => None,
            Some(other) => {
                return Err(CompileError::BadFragment {
                    page: page.to_string(),
                    section: section.to_string(),
                    name: name.to_string(),
                    found: value_kind(other),
                })
            }
        };

        let mut node = match kind {
            // tabs are navigational containers: the tab itself has no
            // fragment, its click XPath becomes a sibling button
            NodeKind::Tab => {
                if let Some(xpath) = xpath {
                    parent.push(Node::button(format!("tab_{name}"), xpath));
                }
                Node::tab(name, "")
            }
            _ => Node::fieldset(name, xpath.unwrap_or_default()),
        };

        for (sub_name, sub_body) in entries {
            if !is_arraylike(sub_body) {
                continue;
            }
            match sub_name.as_str() {
                Some(sub_name) => {
                    self.build_section(page, &mut node.children, sub_name, sub_body)?
                }
                None => self.unknown_section(page, &format!("{sub_name:?}"))?,
            }
        }

        parent.push(node);
        Ok(())
    }

    /// Build a leaf section: a mapping of name -> XPath fragment. Null
    /// values mark placeholder entries and are skipped without error.
    fn build_leaves(
        &self,
        page: &str,
        parent: &mut Vec<Node>,
        section: &str,
        body: &Value,
        kind: NodeKind,
    ) -> Result<(), CompileError> {
        let Some(entries) = body.as_mapping() else {
            return Err(self.bad_structure(
                page,
                &format!(
                    "'{section}' body should map names to XPath strings, {} given",
                    value_kind(body)
                ),
            ));
        };

        for (name, value) in entries {
            let Some(name) = name.as_str() else {
                return Err(self.bad_structure(
                    page,
                    &format!(
                        "name of {section} entry should be a string, {} given",
                        value_kind(name)
                    ),
                ));
            };
            match value {
                Value::Null => continue,
                Value::String(fragment) => parent.push(Node::new(kind, name, fragment)),
                other => {
                    return Err(CompileError::BadFragment {
                        page: page.to_string(),
                        section: section.to_string(),
                        name: name.to_string(),
                        found: value_kind(other),
                    })
                }
            }
        }
        Ok(())
    }

    fn scalar_field(
        &self,
        page: &str,
        description: &Value,
        field: &str,
    ) -> Result<Option<String>, CompileError> {
        match description.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.bad_structure(
                page,
                &format!("'{field}' should be a string, {} given", value_kind(other)),
            )),
        }
    }

    fn unknown_section(&self, page: &str, section: &str) -> Result<(), CompileError> {
        if self.strict {
            return Err(CompileError::SchemaViolation {
                page: page.to_string(),
                section: section.to_string(),
            });
        }
        debug!("skipping unsupported section '{}' on page '{}'", section, page);
        Ok(())
    }

    fn bad_structure(&self, page: &str, reason: &str) -> CompileError {
        CompileError::BadStructure {
            page: page.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn is_arraylike(value: &Value) -> bool {
    matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uimap_model::Locator;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("test YAML")
    }

    const PRODUCT_PAGE: &str = r#"
mca: catalog_product/new/set/%setId%/type/%productType%/
title: New Product / Manage Products / Catalog / Magento Admin
uimap:
    form:
        tabs:
            -
                general:
                    xpath: //a[@title='General']/span
                    fieldsets:
                        -
                            product_general:
                                xpath: //div[contains(div/div/h4,'General')]
                                buttons:
                                    create_new_attribute: //button[span='Create New Attribute']
                                dropdowns:
                                    general_status: //select[@id='status']
                                fields:
                                    general_name: //input[@id='name']
                                    general_sku: //input[@id='sku']
                                multiselects:
                                    general_user_attr: //input[@id='%attributeCode%']
    buttons:
        back: //button[span='Back']
        save: //button[span='Save']
    messages:
        success_saved_product: //li[normalize-space(@class)='success-msg']
"#;

    #[test]
    fn compiles_nested_magento_style_page() {
        let compiler = UimapCompiler::new();
        let page = compiler
            .compile("new_product", &parse(PRODUCT_PAGE))
            .unwrap();

        assert_eq!(page.key(), "new_product");
        assert_eq!(page.url(), "catalog_product/new/set/%setId%/type/%productType%/");
        assert_eq!(
            page.title(),
            "New Product / Manage Products / Catalog / Magento Admin"
        );

        // tab activation button precedes the tab, top-level buttons follow
        let kinds: Vec<(NodeKind, &str)> = page
            .root()
            .children
            .iter()
            .map(|n| (n.kind, n.key.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (NodeKind::Button, "tab_general"),
                (NodeKind::Tab, "general"),
                (NodeKind::Button, "back"),
                (NodeKind::Button, "save"),
            ]
        );

        let tab = &page.root().children[1];
        assert_eq!(tab.fragment, "");
        assert_eq!(tab.children.len(), 1);
        let fieldset = &tab.children[0];
        assert_eq!(fieldset.kind, NodeKind::Fieldset);
        assert_eq!(fieldset.key, "product_general");
        assert_eq!(fieldset.fragment, "//div[contains(div/div/h4,'General')]");

        // messages are not represented in the document
        assert!(page
            .xpath(&Locator::new().with_key("success_saved_product"))
            .is_err());

        // multiselects compile to select nodes
        let xpath = page
            .xpath(
                &Locator::new()
                    .with_key("general_user_attr")
                    .with_kind(NodeKind::Select)
                    .with_parameter("attributeCode", "color"),
            )
            .unwrap();
        assert_eq!(
            xpath,
            "//div[contains(div/div/h4,'General')]//input[@id='color']"
        );
    }

    #[test]
    fn resolves_through_compiled_tab_and_fieldset() {
        let page = UimapCompiler::new()
            .compile("new_product", &parse(PRODUCT_PAGE))
            .unwrap();
        let xpath = page
            .xpath(
                &Locator::new()
                    .with_key("general_name")
                    .with_kind(NodeKind::Field)
                    .with_fieldset("product_general")
                    .with_tab("general"),
            )
            .unwrap();
        assert_eq!(
            xpath,
            "//div[contains(div/div/h4,'General')]//input[@id='name']"
        );

        // the tab activation control is addressable as a top-level button
        let xpath = page
            .xpath(&Locator::new().with_key("tab_general").with_kind(NodeKind::Button))
            .unwrap();
        assert_eq!(xpath, "//a[@title='General']/span");
    }

    #[test]
    fn compilation_is_deterministic() {
        let compiler = UimapCompiler::new();
        let value = parse(PRODUCT_PAGE);
        let first = compiler.compile("p", &value).unwrap();
        let second = compiler.compile("p", &value).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn null_leaf_entries_are_skipped() {
        let yaml = r#"
mca: some/page/
uimap:
    fields:
        a: //x
        b: ~
"#;
        let page = UimapCompiler::new().compile("p", &parse(yaml)).unwrap();
        assert_eq!(page.root().children.len(), 1);
        assert_eq!(page.root().children[0].key, "a");
    }

    #[test]
    fn unknown_section_fails_in_strict_mode() {
        let yaml = r#"
mca: some/page/
uimap:
    bogus_section:
        entry: //x
    buttons:
        save: //button
"#;
        let err = UimapCompiler::new().compile("p", &parse(yaml)).unwrap_err();
        match err {
            CompileError::SchemaViolation { page, section } => {
                assert_eq!(page, "p");
                assert_eq!(section, "bogus_section");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_section_is_skipped_in_lenient_mode() {
        let yaml = r#"
mca: some/page/
uimap:
    bogus_section:
        entry: //x
    buttons:
        save: //button
"#;
        let page = UimapCompiler::lenient().compile("p", &parse(yaml)).unwrap();
        assert_eq!(page.root().children.len(), 1);
        assert_eq!(page.root().children[0].key, "save");
    }

    #[test]
    fn numeric_mapping_keys_unwrap_list_wrapped_containers() {
        let yaml = r#"
mca: some/page/
uimap:
    fieldsets:
        0:
            grid:
                xpath: //div[@id='grid']
                buttons:
                    search: //button[span='Search']
"#;
        let page = UimapCompiler::new().compile("p", &parse(yaml)).unwrap();
        let fieldset = &page.root().children[0];
        assert_eq!(fieldset.kind, NodeKind::Fieldset);
        assert_eq!(fieldset.key, "grid");
        assert_eq!(fieldset.children[0].key, "search");
    }

    #[test]
    fn scalar_valued_uimap_entries_are_ignored() {
        let yaml = r#"
mca: some/page/
click_xpath: //a[span='Manage Products']
uimap:
    some_note: just a string
    buttons:
        save: //button
"#;
        let page = UimapCompiler::new().compile("p", &parse(yaml)).unwrap();
        assert_eq!(page.root().children.len(), 1);
    }

    #[test]
    fn non_string_leaf_fragment_is_an_error() {
        let yaml = r#"
mca: some/page/
uimap:
    fields:
        qty: 42
"#;
        let err = UimapCompiler::new().compile("p", &parse(yaml)).unwrap_err();
        match err {
            CompileError::BadFragment { section, name, found, .. } => {
                assert_eq!(section, "fields");
                assert_eq!(name, "qty");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_mapping_description_is_an_error() {
        let err = UimapCompiler::new()
            .compile("p", &parse("just a scalar"))
            .unwrap_err();
        assert!(matches!(err, CompileError::BadStructure { .. }));
    }

    #[test]
    fn compile_all_preserves_document_order() {
        let yaml = r#"
first_page:
    mca: first/
    uimap:
        buttons:
            go: //button
second_page:
    mca: second/
"#;
        let pages = UimapCompiler::new().compile_all(&parse(yaml)).unwrap();
        let keys: Vec<&str> = pages.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["first_page", "second_page"]);
    }

    #[test]
    fn yaml_anchors_are_shared_between_pages() {
        let yaml = r#"
manage_products:
    mca: catalog_product/
    uimap: &productUimap
        buttons:
            add_new_product: //button[span='Add Product']
edit_product:
    mca: catalog_product/edit/id/%id%/
    uimap: *productUimap
"#;
        let pages = UimapCompiler::new().compile_all(&parse(yaml)).unwrap();
        assert_eq!(pages.len(), 2);
        for page in &pages {
            assert_eq!(page.root().children[0].key, "add_new_product");
        }
    }

    #[test]
    fn radiobuttons_and_checkboxes_share_a_kind() {
        let yaml = r#"
mca: some/page/
uimap:
    checkboxes:
        remember: //input[@id='remember']
    radiobuttons:
        default_option: //input[@name='default']
"#;
        let page = UimapCompiler::new().compile("p", &parse(yaml)).unwrap();
        assert!(page
            .root()
            .children
            .iter()
            .all(|n| n.kind == NodeKind::Checkbox));
    }

    #[test]
    fn invalid_nesting_surfaces_as_page_error() {
        // tabs inside a fieldset violate the structural schema
        let yaml = r#"
mca: some/page/
uimap:
    fieldsets:
        -
            outer:
                xpath: //div
                tabs:
                    -
                        inner:
                            xpath: //a
"#;
        let err = UimapCompiler::new().compile("p", &parse(yaml)).unwrap_err();
        assert!(matches!(err, CompileError::InvalidPage(_)));
    }
}
