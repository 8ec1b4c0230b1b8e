//! Compilation cache seam.
//!
//! The registry may delegate to a pluggable cache keyed by source file.
//! Entries pair the file's modification time with the serialized
//! pre-validation intermediate (`Vec<PageParts>` as JSON); staleness is
//! detected purely by modification-time comparison. Implementations are
//! expected to swallow their own storage failures — a cache can only ever
//! save work, never fail a lookup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

/// Pluggable compilation cache
pub trait PageCache: Send + Sync {
    /// Return the stored (modification time, content) pair, if any
    fn try_get(&self, id: &str) -> Option<(SystemTime, Vec<u8>)>;

    /// Store content for `id` compiled from a file modified at `modified`
    fn put(&self, id: &str, modified: SystemTime, content: &[u8]);

    /// Drop the entry for `id`, if any
    fn invalidate(&self, id: &str);
}

impl<T: PageCache + ?Sized> PageCache for Arc<T> {
    fn try_get(&self, id: &str) -> Option<(SystemTime, Vec<u8>)> {
        (**self).try_get(id)
    }

    fn put(&self, id: &str, modified: SystemTime, content: &[u8]) {
        (**self).put(id, modified, content)
    }

    fn invalidate(&self, id: &str) {
        (**self).invalidate(id)
    }
}

/// Deterministic cache id for a source file: blake3 of the canonicalized
/// path (the path itself when canonicalization fails, e.g. for a file
/// deleted mid-run).
pub fn cache_id(path: &Path) -> String {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    blake3::hash(canonical.to_string_lossy().as_bytes())
        .to_hex()
        .to_string()
}

/// In-memory cache for tests and single-process embedding
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (SystemTime, Vec<u8>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl PageCache for MemoryCache {
    fn try_get(&self, id: &str) -> Option<(SystemTime, Vec<u8>)> {
        self.entries.lock().get(id).cloned()
    }

    fn put(&self, id: &str, modified: SystemTime, content: &[u8]) {
        self.entries
            .lock()
            .insert(id.to_string(), (modified, content.to_vec()));
    }

    fn invalidate(&self, id: &str) {
        self.entries.lock().remove(id);
    }
}
