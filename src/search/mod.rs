//! Code search scoped to a single repository.

use crate::error::Result;
use crate::remote::{RemoteClient, RepositoryRef, SearchHit};

/// Hits returned per search; only the first page is ever requested.
pub const SEARCH_PAGE_SIZE: usize = 100;

/// `"<query> repo:<owner>/<repo>[ extension:<ext>]"`
pub fn compose_query(repo: &RepositoryRef, query: &str, extension: Option<&str>) -> String {
    let mut composed = format!("{} repo:{}", query.trim(), repo.full_name());
    if let Some(ext) = extension.map(|e| e.trim().trim_start_matches('.')).filter(|e| !e.is_empty()) {
        composed.push_str(" extension:");
        composed.push_str(ext);
    }
    composed
}

pub struct CodeSearch<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteClient + ?Sized> CodeSearch<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// First page of matches for `query` in `owner/repo`. Fails as a whole on
    /// any remote error.
    pub async fn search(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let mut hits = self
            .client
            .search_code(repo, query, extension, SEARCH_PAGE_SIZE)
            .await?;
        hits.truncate(SEARCH_PAGE_SIZE);
        Ok(hits)
    }
}
