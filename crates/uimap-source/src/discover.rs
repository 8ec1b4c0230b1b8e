//! UI-map file discovery

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SourceError;

/// Extension of UI-map files
pub const UIMAP_EXTENSION: &str = "yml";

/// Collect the UI-map files under a source location.
///
/// A file location yields itself when it carries the UI-map extension
/// (anything else yields nothing); a directory is scanned recursively.
/// Results are sorted lexicographically by full path so that registration
/// order — and with it first-match-wins URL resolution — does not depend
/// on filesystem iteration order.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();
    if path.is_dir() {
        walk(path, &mut files)?;
    } else if is_uimap_file(path) {
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let entries = fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if is_uimap_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_uimap_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(UIMAP_EXTENSION))
}
