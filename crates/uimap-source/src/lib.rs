//! Page sources: registry, discovery and the cache seam.
//!
//! A [`PageRegistry`] owns an ordered set of (URL prefix, source location)
//! pairs, compiles every discovered UI-map file lazily on first access and
//! memoizes the result for its lifetime. Lookups resolve a page by key or
//! by URL (first registered match wins). An optional [`PageCache`] keyed
//! by file modification time can short-circuit compilation; cache trouble
//! always degrades to a direct compile, never to a failure.

pub mod cache;
pub mod discover;
pub mod errors;
pub mod registry;

pub use cache::{cache_id, MemoryCache, PageCache};
pub use errors::SourceError;
pub use registry::{PageRegistry, PageSource, SourceEntry};
