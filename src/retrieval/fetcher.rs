use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::error::{Result, ScoutError};
use crate::remote::{ContentResponse, FileContent, RemoteClient, RepositoryRef};

/// One file to fetch, at a specific snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub path: String,
    pub repo: RepositoryRef,
}

/// Outcome for a single requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DownloadResult {
    Success {
        path: String,
        content: String,
        size: u64,
        sha: String,
    },
    Failure {
        path: String,
        error: String,
    },
}

impl DownloadResult {
    pub fn path(&self) -> &str {
        match self {
            DownloadResult::Success { path, .. } | DownloadResult::Failure { path, .. } => path.as_str(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DownloadResult::Success { .. })
    }
}

pub struct BulkFetcher<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteClient + ?Sized> BulkFetcher<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// One result per request, in request order. A failing path yields a
    /// `Failure` entry and never stops the others.
    pub async fn fetch_all(&self, requests: &[DownloadRequest]) -> Vec<DownloadResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let result = match self.fetch_one(request).await {
                Ok((content, size, sha)) => DownloadResult::Success {
                    path: request.path.clone(),
                    content,
                    size,
                    sha,
                },
                Err(e) => {
                    tracing::warn!(path = %request.path, error = %e, "download failed");
                    DownloadResult::Failure {
                        path: request.path.clone(),
                        error: e.to_string(),
                    }
                }
            };
            results.push(result);
        }
        results
    }

    async fn fetch_one(&self, request: &DownloadRequest) -> Result<(String, u64, String)> {
        let file = match self.client.get_content(&request.repo, &request.path).await? {
            ContentResponse::File(file) => file,
            // The path named a directory; only an entry for the exact path counts.
            ContentResponse::Directory(entries) => {
                let wanted = request.path.trim_matches('/');
                entries
                    .into_iter()
                    .find(|entry| entry.path.trim_matches('/') == wanted && entry.content.is_some())
                    .ok_or_else(|| ScoutError::NotFound(request.path.clone()))?
            }
        };
        into_text(file)
    }
}

fn into_text(file: FileContent) -> Result<(String, u64, String)> {
    let encoded = file
        .content
        .ok_or_else(|| ScoutError::NotFound(format!("{} has no inline content", file.path)))?;
    let content = decode_content(&encoded)?;
    let size = file.size.unwrap_or(content.len() as u64);
    Ok((content, size, file.sha.unwrap_or_default()))
}

/// Decodes the API's base64 payload, which arrives wrapped at 60 columns.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ScoutError::Decode(format!("invalid base64 content: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
