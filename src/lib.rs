pub mod cache;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod remote;
pub mod retrieval;
pub mod search;

pub use cache::{CacheKey, CachingClient, ResponseCache};
pub use config::ClientConfig;
pub use discovery::{PatternMatcher, TreeWalker, DEFAULT_MAX_RESULTS};
pub use engine::{DownloadFilesOutput, Engine, FindFilesOutput, SearchCodeOutput};
pub use error::{Result, ScoutError};
pub use mcp::{Dispatcher, McpServer, Operation};
pub use remote::{
    ContentResponse, FileContent, FileNode, GitHubClient, NodeKind, RemoteClient, RepositoryRef,
    SearchHit, DEFAULT_BRANCH,
};
pub use retrieval::{BulkFetcher, DownloadRequest, DownloadResult};
pub use search::{compose_query, CodeSearch};
