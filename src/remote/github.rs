use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::{ContentResponse, FileContent, FileNode, NodeKind, RemoteClient, RepositoryRef, SearchHit};
use crate::config::ClientConfig;
use crate::error::{Result, ScoutError};
use crate::search::compose_query;

const API_VERSION: &str = "2022-11-28";

/// [`RemoteClient`] backed by the GitHub REST API.
pub struct GitHubClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ScoutError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}?ref={reference}`
    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> Result<Url> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));

        let mut url = self.endpoint(&segments)?;
        url.query_pairs_mut().append_pair("ref", &repo.reference);
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(self.config.base_url())
            .map_err(|e| ScoutError::Config(format!("invalid api url '{}': {}", self.config.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ScoutError::Config(format!("api url '{}' cannot be a base", self.config.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!(%url, "GET");

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, &self.config.user_agent)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = self.config.token.as_ref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScoutError::remote(None, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::remote(Some(status.as_u16()), format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ScoutError::remote(Some(status.as_u16()), error_message(&body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            ScoutError::Decode(format!("invalid JSON from hosting API: {} (body={})", e, truncate_for_error(&body)))
        })
    }
}

#[async_trait]
impl RemoteClient for GitHubClient {
    async fn list_directory(&self, repo: &RepositoryRef, path: &str) -> Result<Vec<FileNode>> {
        let url = self.contents_url(repo, path)?;
        let entries = match self.get_json(url).await? {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value::<RawEntry>)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            // A file path lists as itself.
            other => vec![serde_json::from_value::<RawEntry>(other)?],
        };

        Ok(entries
            .into_iter()
            .map(|e| FileNode {
                path: e.path,
                kind: e.kind,
            })
            .collect())
    }

    async fn get_content(&self, repo: &RepositoryRef, path: &str) -> Result<ContentResponse> {
        let url = self.contents_url(repo, path)?;
        let response = match self.get_json(url).await? {
            Value::Array(items) => {
                let entries = items
                    .into_iter()
                    .map(serde_json::from_value::<RawEntry>)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                ContentResponse::Directory(entries.into_iter().map(RawEntry::into_content).collect())
            }
            other => ContentResponse::File(serde_json::from_value::<RawEntry>(other)?.into_content()),
        };
        Ok(response)
    }

    async fn search_code(
        &self,
        repo: &RepositoryRef,
        query: &str,
        extension: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<SearchHit>> {
        let mut url = self.endpoint(&["search", "code"])?;
        url.query_pairs_mut()
            .append_pair("q", &compose_query(repo, query, extension))
            .append_pair("per_page", &per_page.to_string());

        let parsed: RawSearchResponse = serde_json::from_value(self.get_json(url).await?)?;
        Ok(parsed
            .items
            .into_iter()
            .map(|item| SearchHit {
                path: item.path,
                sha: item.sha,
                url: item.html_url,
                repository: item.repository.full_name,
            })
            .collect())
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| truncate_for_error(body))
}

fn truncate_for_error(value: &str) -> String {
    const LIMIT: usize = 400;
    if value.len() <= LIMIT {
        value.to_string()
    } else {
        let mut end = LIMIT;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &value[..end])
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    path: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl RawEntry {
    fn into_content(self) -> FileContent {
        FileContent {
            path: self.path,
            content: self.content,
            size: self.size,
            sha: self.sha,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    items: Vec<RawSearchItem>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    path: String,
    sha: String,
    html_url: String,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GitHubClient {
        GitHubClient::new(ClientConfig::default().with_api_url(api_url)).unwrap()
    }

    #[test]
    fn test_contents_url_for_root() {
        let repo = RepositoryRef::new("acme", "widgets", None);
        let url = client("https://api.github.com").contents_url(&repo, "").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/acme/widgets/contents?ref=main");
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let repo = RepositoryRef::new("acme", "widgets", Some("feature/x".to_string()));
        let url = client("https://ghe.example.com/api/v3/")
            .contents_url(&repo, "docs/my notes/a#b.md")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/widgets/contents/docs/my%20notes/a%23b.md?ref=feature%2Fx"
        );
    }

    #[test]
    fn test_invalid_api_url_is_config_error() {
        let repo = RepositoryRef::new("acme", "widgets", None);
        let err = client("not a url").contents_url(&repo, "").unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn test_error_message_prefers_api_message() {
        assert_eq!(error_message(r#"{"message":"Bad credentials"}"#), "Bad credentials");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_truncate_for_error_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_for_error(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 403);
    }
}
