//! The three repository operations, wired through one shared cache.

use serde::{Deserialize, Serialize};

use crate::cache::CachingClient;
use crate::discovery::{PatternMatcher, TreeWalker};
use crate::error::Result;
use crate::remote::{RemoteClient, RepositoryRef, SearchHit};
use crate::retrieval::{BulkFetcher, DownloadRequest, DownloadResult};
use crate::search::{compose_query, CodeSearch};

/// Pattern used by `find_files` when none is given.
pub const DEFAULT_PATTERN: &str = "**/*";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindFilesOutput {
    pub found: usize,
    pub files: Vec<String>,
    pub pattern: String,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadFilesOutput {
    pub downloaded: usize,
    pub total: usize,
    pub files: Vec<DownloadResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCodeOutput {
    /// The query as sent to the hosting API.
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

/// Entry point for discovery, retrieval and search against one hosting API.
///
/// Every remote call goes through the engine's cache, so the engine should be
/// shared (e.g. behind an `Arc`) rather than rebuilt per request.
pub struct Engine<C> {
    client: CachingClient<C>,
}

impl<C: RemoteClient> Engine<C> {
    pub fn new(remote: C) -> Self {
        Self {
            client: CachingClient::new(remote),
        }
    }

    pub fn client(&self) -> &CachingClient<C> {
        &self.client
    }

    pub async fn find_files(
        &self,
        repo: &RepositoryRef,
        pattern: &str,
        max_results: usize,
    ) -> Result<FindFilesOutput> {
        let all = TreeWalker::new(&self.client).enumerate(repo).await?;
        let files = PatternMatcher::new(pattern).filter(&all, max_results);

        tracing::info!(
            repo = %repo.full_name(),
            branch = %repo.reference,
            pattern,
            scanned = all.len(),
            found = files.len(),
            "find_files"
        );
        Ok(FindFilesOutput {
            found: files.len(),
            files,
            pattern: pattern.to_string(),
            branch: repo.reference.clone(),
        })
    }

    pub async fn download_files(&self, requests: &[DownloadRequest]) -> DownloadFilesOutput {
        let files = BulkFetcher::new(&self.client).fetch_all(requests).await;
        let downloaded = files.iter().filter(|f| f.is_success()).count();

        tracing::info!(downloaded, total = requests.len(), "download_files");
        DownloadFilesOutput {
            downloaded,
            total: requests.len(),
            files,
        }
    }

    pub async fn search_code(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
    ) -> Result<SearchCodeOutput> {
        let results = CodeSearch::new(&self.client).search(repo, query, extension).await?;
        let query = compose_query(repo, query, extension);

        tracing::info!(query = %query, total = results.len(), "search_code");
        Ok(SearchCodeOutput {
            query,
            total: results.len(),
            results,
        })
    }
}
