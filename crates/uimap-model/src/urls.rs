//! URL normalization, pattern-to-regex compilation and placeholder
//! substitution.
//!
//! Page URL patterns are literal admin paths with `%name%` placeholders
//! for variable segments. Candidate URLs carry volatile segments (session
//! keys, grid filters, form keys, `/index/` suffixes) that must be
//! stripped before comparison.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// `%name%` placeholder token
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new("%[^%]+%").expect("placeholder regex"));

/// Volatile path segments stripped during normalization, case-insensitive
static VOLATILE_SEGMENTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)/key/[^/]+/",
        r"(?i)/filter/[^/]+/",
        r"(?i)/form_key/[^/]+",
        r"(?i)/index/$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("volatile segment regex"))
    .collect()
});

/// Normalize a URL or URL pattern for matching: strip volatile segments,
/// then trim trailing slashes.
pub fn normalize_url(url: &str) -> String {
    let mut out = url.to_string();
    for pattern in VOLATILE_SEGMENTS.iter() {
        out = pattern.replace_all(&out, "/").into_owned();
    }
    out.trim_end_matches('/').to_string()
}

/// Compile a URL pattern into a matching regex.
///
/// The normalized pattern is literal-escaped, every `%name%` placeholder
/// becomes a lazy wildcard `(.*?)`, and the whole expression is anchored
/// at the end. Patterns are path suffixes (they never carry scheme or
/// host), so no start anchor is applied; lazy wildcards keep adjacent
/// placeholder captures minimal.
pub fn build_url_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(&normalize_url(pattern));
    let wildcarded = PLACEHOLDER.replace_all(&escaped, "(.*?)");
    Regex::new(&format!("{wildcarded}$"))
}

/// Replace every `%name%` token that has a matching parameter; tokens
/// without one stay literal so partially-parameterized templates keep
/// resolving at later stages.
pub fn substitute_params(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("%{name}%"), value);
    }
    out
}
