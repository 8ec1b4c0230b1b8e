//! Page registry

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use uimap_compiler::UimapCompiler;
use uimap_model::{PageDocument, PageParts};

use crate::cache::{cache_id, PageCache};
use crate::discover::discover;
use crate::errors::SourceError;

/// Resolves compiled pages by key or by URL
pub trait PageSource: Send + Sync {
    /// Page with the given key, `PageNotFound` if absent
    fn page_by_key(&self, key: &str) -> Result<Arc<PageDocument>, SourceError>;

    /// First registered page whose URL pattern matches, `PageNotFoundByUrl`
    /// if none does
    fn page_by_url(&self, url: &str) -> Result<Arc<PageDocument>, SourceError>;
}

/// One configured source location with its URL prefix.
///
/// Every page compiled from the location gets `prefix + urlPattern` as its
/// effective pattern; the default prefix is empty.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub prefix: String,
    pub path: PathBuf,
}

impl SourceEntry {
    pub fn new(prefix: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
        }
    }

    /// Entry without a URL prefix
    pub fn unprefixed(path: impl Into<PathBuf>) -> Self {
        Self::new("", path)
    }
}

/// Owns the compiled pages of one or more source locations.
///
/// Sources are compiled lazily on first lookup and memoized for the
/// registry's lifetime behind a once-cell, which doubles as the exclusive
/// initialization guard when the registry is shared across threads.
/// Failed initialization is not memoized; the next lookup retries.
pub struct PageRegistry {
    entries: Vec<SourceEntry>,
    compiler: UimapCompiler,
    cache: Option<Box<dyn PageCache>>,
    pages: OnceCell<PageSet>,
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRegistry")
            .field("entries", &self.entries)
            .field("cache", &self.cache.is_some())
            .field("pages", &self.pages.get().is_some())
            .finish()
    }
}

impl PageRegistry {
    /// Create a registry over the given source entries.
    ///
    /// Every location is checked eagerly: a nonexistent or unreadable path
    /// fails construction, as does an empty entry set.
    pub fn new(entries: Vec<SourceEntry>) -> Result<Self, SourceError> {
        if entries.is_empty() {
            return Err(SourceError::NoSources);
        }
        for entry in &entries {
            fs::metadata(&entry.path).map_err(|err| SourceError::InvalidSourceLocation {
                path: entry.path.clone(),
                reason: err.to_string(),
            })?;
        }
        Ok(Self {
            entries,
            compiler: UimapCompiler::new(),
            cache: None,
            pages: OnceCell::new(),
        })
    }

    /// Registry over a single unprefixed location
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        Self::new(vec![SourceEntry::unprefixed(path)])
    }

    /// Switch the compiler to lenient mode (unknown sections skipped)
    pub fn lenient(mut self) -> Self {
        self.compiler = UimapCompiler::lenient();
        self
    }

    /// Attach a compilation cache
    pub fn with_cache(mut self, cache: Box<dyn PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// All compiled pages in registration order
    pub fn documents(&self) -> Result<Vec<Arc<PageDocument>>, SourceError> {
        Ok(self.pages()?.order.clone())
    }

    fn pages(&self) -> Result<&PageSet, SourceError> {
        self.pages.get_or_try_init(|| self.load())
    }

    fn load(&self) -> Result<PageSet, SourceError> {
        let mut set = PageSet::default();
        let mut files = 0usize;
        for entry in &self.entries {
            for file in discover(&entry.path)? {
                files += 1;
                for document in self.load_file(&file, &entry.prefix)? {
                    set.insert(Arc::new(document));
                }
            }
        }
        info!("compiled {} uimap pages from {} files", set.order.len(), files);
        Ok(set)
    }

    /// Compile one file, consulting the cache first. Cache content is the
    /// pre-validation intermediate; it is re-validated here on every hit,
    /// and any decode or validation trouble falls back to a fresh compile.
    fn load_file(&self, file: &Path, prefix: &str) -> Result<Vec<PageDocument>, SourceError> {
        let id = cache_id(file);
        let modified = fs::metadata(file).and_then(|meta| meta.modified()).ok();

        if let (Some(cache), Some(modified)) = (self.cache.as_deref(), modified) {
            if let Some(documents) = self.load_cached(cache, &id, file, modified) {
                return Ok(documents);
            }
        }

        self.compile_file(file, prefix, modified.map(|m| (id.as_str(), m)))
    }

    fn load_cached(
        &self,
        cache: &dyn PageCache,
        id: &str,
        file: &Path,
        modified: SystemTime,
    ) -> Option<Vec<PageDocument>> {
        let (cached_at, bytes) = cache.try_get(id)?;
        if cached_at != modified {
            debug!("stale cache entry for '{}'", file.display());
            cache.invalidate(id);
            return None;
        }
        let parts: Vec<PageParts> = match serde_json::from_slice(&bytes) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(
                    "discarding undecodable cache entry for '{}': {}",
                    file.display(),
                    err
                );
                cache.invalidate(id);
                return None;
            }
        };
        match parts
            .into_iter()
            .map(PageDocument::try_from)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(documents) => {
                debug!("cache hit for '{}'", file.display());
                Some(documents)
            }
            Err(err) => {
                warn!(
                    "discarding invalid cache entry for '{}': {}",
                    file.display(),
                    err
                );
                cache.invalidate(id);
                None
            }
        }
    }

    fn compile_file(
        &self,
        file: &Path,
        prefix: &str,
        cache_slot: Option<(&str, SystemTime)>,
    ) -> Result<Vec<PageDocument>, SourceError> {
        let text = fs::read_to_string(file).map_err(|source| SourceError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|source| SourceError::Parse {
                path: file.to_path_buf(),
                source,
            })?;

        let mut parts = self
            .compiler
            .compile_all_parts(&value)
            .map_err(|source| SourceError::Compile {
                path: file.to_path_buf(),
                source,
            })?;
        for page in &mut parts {
            page.url = format!("{prefix}{}", page.url);
        }

        if let (Some(cache), Some((id, modified))) = (self.cache.as_deref(), cache_slot) {
            match serde_json::to_vec(&parts) {
                Ok(bytes) => cache.put(id, modified, &bytes),
                Err(err) => warn!("cannot encode cache entry for '{}': {}", file.display(), err),
            }
        }

        parts
            .into_iter()
            .map(|p| PageDocument::try_from(p).map_err(SourceError::from))
            .collect()
    }
}

impl PageSource for PageRegistry {
    fn page_by_key(&self, key: &str) -> Result<Arc<PageDocument>, SourceError> {
        let pages = self.pages()?;
        pages
            .index
            .get(key)
            .map(|&i| pages.order[i].clone())
            .ok_or_else(|| SourceError::PageNotFound {
                key: key.to_string(),
            })
    }

    fn page_by_url(&self, url: &str) -> Result<Arc<PageDocument>, SourceError> {
        for page in &self.pages()?.order {
            if page.matches_url(url)? {
                debug!("URL '{}' matched page '{}'", url, page.key());
                return Ok(page.clone());
            }
        }
        Err(SourceError::PageNotFoundByUrl {
            url: url.to_string(),
        })
    }
}

/// Ordered page set with by-key index. Registering a key again replaces
/// the earlier document in place, keeping its original position.
#[derive(Default)]
struct PageSet {
    order: Vec<Arc<PageDocument>>,
    index: HashMap<String, usize>,
}

impl PageSet {
    fn insert(&mut self, page: Arc<PageDocument>) {
        match self.index.get(page.key()) {
            Some(&i) => self.order[i] = page,
            None => {
                self.index.insert(page.key().to_string(), self.order.len());
                self.order.push(page);
            }
        }
    }
}
