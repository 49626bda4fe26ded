//! Remote repository access
//!
//! Types describing what the hosting API returns, and the [`RemoteClient`]
//! trait every engine component talks through.

mod github;

#[cfg(test)]
pub(crate) mod fake;

pub use github::GitHubClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Branch used when a request does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// A queryable snapshot of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit.
    pub reference: String,
}

impl RepositoryRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        reference: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            reference: reference
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        }
    }

    /// Same repository, different snapshot.
    pub fn at(&self, reference: impl Into<String>) -> Self {
        Self {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            reference: reference.into(),
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    #[serde(alias = "dir")]
    Directory,
    /// Symlinks and submodules; never expanded or listed.
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub kind: NodeKind,
}

impl FileNode {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Directory,
        }
    }
}

/// File metadata as returned by the content endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    /// Base64 payload, possibly wrapped across lines.
    pub content: Option<String>,
    pub size: Option<u64>,
    pub sha: Option<String>,
}

/// The content endpoint answers with either a single file or, when the path
/// names a directory, a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentResponse {
    File(FileContent),
    Directory(Vec<FileContent>),
}

/// A normalized code-search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub sha: String,
    pub url: String,
    /// `owner/repo` of the repository the match lives in.
    pub repository: String,
}

/// Read-only calls against the hosting API.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Directory contents at `path`; an empty path is the repository root.
    async fn list_directory(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<FileNode>>;

    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<ContentResponse>;

    /// Code search scoped to `repo`, optionally narrowed to one file extension.
    async fn search_code(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<SearchHit>>;
}
