//! CLI smoke tests against a generated UI-map tree.

use std::fs;
use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

const PRODUCTS_YML: &str = r#"
new_product:
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
                                    xpath: //div[@id='general']
                                    fields:
                                        general_name: //input[@id='name']
        buttons:
            save: //button[span='Save']
"#;

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("products.yml"), PRODUCTS_YML).unwrap();
    dir
}

fn uimap(dir: &Path, args: &[&str]) -> Output {
    Command::cargo_bin("uimap")
        .unwrap()
        .arg(args[0])
        .arg(dir)
        .args(&args[1..])
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_page_count() {
    let dir = fixture();
    let output = uimap(dir.path(), &["check"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "OK: 1 pages");
}

#[test]
fn check_fails_on_unknown_section_unless_lenient() {
    let dir = fixture();
    fs::write(
        dir.path().join("bad.yml"),
        "page:\n    mca: x/\n    uimap:\n        bogus_section:\n            a: //x\n",
    )
    .unwrap();

    let output = uimap(dir.path(), &["check"]);
    assert!(!output.status.success());

    let output = uimap(dir.path(), &["check", "--lenient"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "OK: 2 pages");
}

#[test]
fn pages_lists_keys_and_patterns() {
    let dir = fixture();
    let output = uimap(dir.path(), &["pages"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("new_product"));
    assert!(out.contains("catalog_product/new/set/%setId%/type/%productType%/"));
}

#[test]
fn match_url_prints_the_page_key() {
    let dir = fixture();
    let output = uimap(
        dir.path(),
        &[
            "match-url",
            "--url",
            "http://magento.local/index.php/admin/catalog_product/new/set/4/type/simple/key/0a7509c5cd813114f278465fc7d0c729b5ab76391ef97470cb448985c5befe72/",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "new_product");
}

#[test]
fn xpath_resolves_a_full_locator() {
    let dir = fixture();
    let output = uimap(
        dir.path(),
        &[
            "xpath",
            "--page-key",
            "new_product",
            "--key",
            "general_name",
            "--type",
            "field",
            "--fieldset",
            "product_general",
            "--tab",
            "general",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "//div[@id='general']//input[@id='name']");
}

#[test]
fn xpath_requires_a_page_reference() {
    let dir = fixture();
    let output = uimap(dir.path(), &["xpath", "--key", "save"]);
    assert!(!output.status.success());
}
