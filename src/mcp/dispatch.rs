use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::params::{DownloadFilesParams, FindFilesParams, SearchCodeParams};
use crate::discovery::DEFAULT_MAX_RESULTS;
use crate::engine::{Engine, DEFAULT_PATTERN};
use crate::error::{Result, ScoutError};
use crate::remote::{RemoteClient, RepositoryRef};
use crate::retrieval::DownloadRequest;

/// The operations exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindFiles,
    DownloadFiles,
    SearchCode,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::FindFiles,
        Operation::DownloadFiles,
        Operation::SearchCode,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::FindFiles => "find_files",
            Operation::DownloadFiles => "download_files",
            Operation::SearchCode => "search_code",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Operation::FindFiles => "Find Files",
            Operation::DownloadFiles => "Download Files",
            Operation::SearchCode => "Search Code",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::FindFiles => "List repository files matching a glob pattern",
            Operation::DownloadFiles => "Fetch the contents of several repository files",
            Operation::SearchCode => "Full-text code search within a repository",
        }
    }
}

/// Routes a named tool call to the engine and renders the result as JSON text.
pub struct Dispatcher<C> {
    engine: Arc<Engine<C>>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<C: RemoteClient> Dispatcher<C> {
    pub fn new(engine: Arc<Engine<C>>) -> Self {
        Self { engine }
    }

    /// Fails with `UnknownOperation` for names outside the catalog and
    /// `InvalidArguments` when arguments are missing or malformed; any other
    /// error comes from the operation itself.
    pub async fn dispatch(&self, name: &str, arguments: Option<Map<String, Value>>) -> Result<String> {
        let operation =
            Operation::from_name(name).ok_or_else(|| ScoutError::UnknownOperation(name.to_string()))?;
        let arguments = Value::Object(arguments.unwrap_or_default());

        match operation {
            Operation::FindFiles => {
                let params: FindFilesParams = parse_arguments(arguments)?;
                let repo = repository(&params.owner, &params.repo, params.branch)?;
                let pattern = params
                    .pattern
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_PATTERN.to_string());
                let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

                render(&self.engine.find_files(&repo, &pattern, max_results).await?)
            }
            Operation::DownloadFiles => {
                let params: DownloadFilesParams = parse_arguments(arguments)?;
                let repo = repository(&params.owner, &params.repo, params.branch)?;
                let requests = params
                    .files
                    .iter()
                    .map(|spec| {
                        require("files[].path", spec.path())?;
                        Ok(DownloadRequest {
                            path: spec.path().to_string(),
                            repo: match spec.branch().filter(|b| !b.trim().is_empty()) {
                                Some(branch) => repo.at(branch),
                                None => repo.clone(),
                            },
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                render(&self.engine.download_files(&requests).await)
            }
            Operation::SearchCode => {
                let params: SearchCodeParams = parse_arguments(arguments)?;
                let repo = repository(&params.owner, &params.repo, None)?;
                require("query", &params.query)?;

                render(
                    &self
                        .engine
                        .search_code(&repo, &params.query, params.extension.as_deref())
                        .await?,
                )
            }
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| ScoutError::InvalidArguments(e.to_string()))
}

fn repository(owner: &str, repo: &str, branch: Option<String>) -> Result<RepositoryRef> {
    require("owner", owner)?;
    require("repo", repo)?;
    Ok(RepositoryRef::new(owner.trim(), repo.trim(), branch))
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ScoutError::InvalidArguments(format!("`{}` must not be empty", field)))
    } else {
        Ok(())
    }
}

fn render<T: Serialize>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}
