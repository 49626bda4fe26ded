//! Tool parameters as they arrive over the wire.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// === find_files ===
/// Parameters for listing repository files that match a pattern
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindFilesParams {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Glob pattern such as "**/*.ts" (default: all files)
    #[serde(default)]
    pub pattern: Option<String>,
    /// Branch, tag or commit (default: "main")
    #[serde(default)]
    pub branch: Option<String>,
    /// Maximum number of paths returned (default: 100)
    #[serde(default, rename = "maxResults", alias = "max_results")]
    pub max_results: Option<usize>,
}

// === download_files ===
/// Parameters for fetching file contents in bulk
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DownloadFilesParams {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Files to fetch: paths, or objects with their own branch
    pub files: Vec<FileSpec>,
    /// Branch for files that do not name one (default: "main")
    #[serde(default)]
    pub branch: Option<String>,
}

/// A file to fetch
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FileSpec {
    Path(String),
    Detailed {
        /// Path inside the repository
        path: String,
        /// Branch, tag or commit for this file
        #[serde(default)]
        branch: Option<String>,
    },
}

impl FileSpec {
    pub fn path(&self) -> &str {
        match self {
            FileSpec::Path(path) | FileSpec::Detailed { path, .. } => path.as_str(),
        }
    }

    pub fn branch(&self) -> Option<&str> {
        match self {
            FileSpec::Path(_) => None,
            FileSpec::Detailed { branch, .. } => branch.as_deref(),
        }
    }
}

// === search_code ===
/// Parameters for full-text code search in one repository
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchCodeParams {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Search terms in the hosting API's code-search syntax
    pub query: String,
    /// Restrict matches to one file extension, e.g. "go"
    #[serde(default)]
    pub extension: Option<String>,
}
