use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, ResponseCache};
use crate::config::DEFAULT_TTL;
use crate::error::Result;
use crate::remote::{ContentResponse, FileNode, RemoteClient, RepositoryRef, SearchHit};

/// A [`RemoteClient`] that answers repeated requests from a [`ResponseCache`]
/// and forwards the rest to the wrapped client.
pub struct CachingClient<C> {
    inner: C,
    listings: ResponseCache<Vec<FileNode>>,
    contents: ResponseCache<ContentResponse>,
    searches: ResponseCache<Vec<SearchHit>>,
}

impl<C: RemoteClient> CachingClient<C> {
    pub fn new(inner: C) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            listings: ResponseCache::with_ttl(ttl),
            contents: ResponseCache::with_ttl(ttl),
            searches: ResponseCache::with_ttl(ttl),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Entries held across all response kinds.
    pub fn cached_entries(&self) -> usize {
        self.listings.len() + self.contents.len() + self.searches.len()
    }
}

#[async_trait]
impl<C: RemoteClient> RemoteClient for CachingClient<C> {
    async fn list_directory(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<FileNode>> {
        let key = if path.trim_matches('/').is_empty() {
            CacheKey::tree(repo)
        } else {
            CacheKey::contents(repo, path)
        };
        self.listings
            .get_or_compute(&key, || self.inner.list_directory(repo, path))
            .await
    }

    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<ContentResponse> {
        let key = CacheKey::file(repo, path);
        self.contents
            .get_or_compute(&key, || self.inner.get_content(repo, path))
            .await
    }

    async fn search_code(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<SearchHit>> {
        let key = CacheKey::search(repo, query, extension);
        self.searches
            .get_or_compute(&key, || self.inner.search_code(repo, query, extension, per_page))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeRemote;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("acme", "widgets", None)
    }

    #[tokio::test]
    async fn test_repeated_listing_hits_remote_once() {
        let client = CachingClient::new(FakeRemote::with_files(&["src/a.ts", "README.md"]));

        let first = client.list_directory(&repo(), "").await.unwrap();
        let second = client.list_directory(&repo(), "").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.inner().call_count("list:"), 1);
    }

    #[tokio::test]
    async fn test_refs_are_cached_separately() {
        let client = CachingClient::new(FakeRemote::with_files(&["src/a.ts"]));

        client.list_directory(&repo(), "src").await.unwrap();
        client.list_directory(&repo().at("dev"), "src").await.unwrap();

        assert_eq!(client.inner().call_count("list:src"), 2);
        assert_eq!(client.cached_entries(), 2);
    }

    #[tokio::test]
    async fn test_search_cache_follows_the_sent_query() {
        let client = CachingClient::new(FakeRemote::default());

        client.search_code(&repo(), "TODO|ext=go", None, 100).await.unwrap();
        client.search_code(&repo(), "TODO", Some("go"), 100).await.unwrap();
        client.search_code(&repo(), "TODO", Some(".go"), 100).await.unwrap();
        client.search_code(&repo(), " TODO ", Some("go"), 100).await.unwrap();

        assert_eq!(
            client.inner().calls(),
            vec![
                "search:TODO|ext=go repo:acme/widgets",
                "search:TODO repo:acme/widgets extension:go",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let client = CachingClient::new(FakeRemote::with_files(&["src/a.ts"]).failing("src/a.ts"));

        assert!(client.get_content(&repo(), "src/a.ts").await.is_err());
        assert!(client.get_content(&repo(), "src/a.ts").await.is_err());

        assert_eq!(client.inner().call_count("content:src/a.ts"), 2);
        assert_eq!(client.cached_entries(), 0);
    }
}
