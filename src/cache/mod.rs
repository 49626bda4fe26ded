//! Short-lived response cache
//!
//! Remote responses are kept for a fixed window keyed by request identity.
//! Entries expire lazily on read; nothing is persisted.

mod client;

pub use client::CachingClient;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::DEFAULT_TTL;
use crate::remote::RepositoryRef;
use crate::search::compose_query;

/// Identity of a cached request. Logically identical requests render to the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Root listing of a repository.
    pub fn tree(repo: &RepositoryRef) -> Self {
        Self::build("tree", repo, "")
    }

    /// Listing of a subdirectory.
    pub fn contents(repo: &RepositoryRef, path: &str) -> Self {
        Self::build("contents", repo, normalize_path(path))
    }

    /// Metadata and content of a single path.
    pub fn file(repo: &RepositoryRef, path: &str) -> Self {
        Self::build("file", repo, normalize_path(path))
    }

    /// Keyed on the query string actually sent, which already names the
    /// repository; the ref plays no part in code search.
    pub fn search(repo: &RepositoryRef, query: &str, extension: Option<&str>) -> Self {
        CacheKey(format!("search:{}", compose_query(repo, query, extension)))
    }

    fn build(kind: &str, repo: &RepositoryRef, detail: &str) -> Self {
        CacheKey(format!(
            "{}:{}/{}@{}:{}",
            kind, repo.owner, repo.repo, repo.reference, detail
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Time-windowed key/value store.
///
/// Concurrent callers missing on the same key each run their own `compute`;
/// the last one to finish wins the slot.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the fresh value under `key`, or runs `compute` and stores its
    /// result. Errors are returned as-is and never stored.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &CacheKey, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.lookup(key) {
            tracing::debug!(%key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(%key, "cache miss");
        let value = compute().await?;

        self.lock().insert(
            key.clone(),
            CacheEntry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &CacheKey) -> Option<V> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        // Entries are plain values; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
