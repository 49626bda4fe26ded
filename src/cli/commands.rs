use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use repo_scout::config::DEFAULT_API_URL;
use repo_scout::error::{Result, ScoutError};
use repo_scout::{
    ClientConfig, DownloadRequest, Engine, GitHubClient, McpServer, RepositoryRef,
    DEFAULT_MAX_RESULTS,
};

#[derive(Parser)]
#[command(name = "repo-scout")]
#[command(about = "Discover, download and search files in hosted repositories")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Start MCP server on stdio
    repo-scout serve

    # List TypeScript files on the default branch
    repo-scout find acme widgets --pattern "**/*.ts"

    # Download two files from a tag
    repo-scout download acme widgets README.md src/lib.rs --branch v1.0.0

    # Search Go files for TODO markers
    repo-scout search acme widgets TODO --extension go
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Hosting API base URL
    #[arg(long, global = true, env = "REPO_SCOUT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API token (falls back to GITHUB_PERSONAL_ACCESS_TOKEN)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let from_env = ClientConfig::from_env();
        let token = self.token.clone().or(from_env.token.clone());
        from_env.with_api_url(self.api_url.clone()).with_token(token)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start MCP server on stdin/stdout
    Serve,

    /// List files matching a glob pattern
    Find {
        owner: String,
        repo: String,

        /// Glob pattern
        #[arg(long, default_value = "**/*")]
        pattern: String,

        /// Branch, tag or commit
        #[arg(long)]
        branch: Option<String>,

        /// Maximum number of paths
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },

    /// Print the contents of one or more files
    Download {
        owner: String,
        repo: String,

        /// Paths inside the repository
        #[arg(required = true)]
        paths: Vec<String>,

        /// Branch, tag or commit
        #[arg(long)]
        branch: Option<String>,
    },

    /// Search code within a repository
    Search {
        owner: String,
        repo: String,
        query: String,

        /// Restrict to one file extension
        #[arg(long)]
        extension: Option<String>,
    },
}

fn build_engine(config: ClientConfig) -> Result<Engine<GitHubClient>> {
    if config.token.is_none() {
        tracing::info!("no API token configured, using unauthenticated rate limits");
    }
    Ok(Engine::new(GitHubClient::new(config)?))
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

pub async fn run_mcp_server(config: ClientConfig) -> Result<()> {
    use rmcp::ServiceExt;

    let engine = Arc::new(build_engine(config)?);
    let server = McpServer::new(engine);

    tracing::info!("serving MCP on stdio");
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let running = server
        .serve(transport)
        .await
        .map_err(|e| ScoutError::Mcp(e.to_string()))?;
    running
        .waiting()
        .await
        .map_err(|e| ScoutError::Mcp(e.to_string()))?;

    Ok(())
}

pub async fn find_files(
    config: ClientConfig,
    owner: &str,
    repo: &str,
    pattern: &str,
    branch: Option<String>,
    max_results: usize,
) -> Result<()> {
    let engine = build_engine(config)?;
    let repo = RepositoryRef::new(owner, repo, branch);
    print_json(&engine.find_files(&repo, pattern, max_results).await?)
}

pub async fn download_files(
    config: ClientConfig,
    owner: &str,
    repo: &str,
    paths: &[String],
    branch: Option<String>,
) -> Result<()> {
    let engine = build_engine(config)?;
    let repo = RepositoryRef::new(owner, repo, branch);
    let requests: Vec<DownloadRequest> = paths
        .iter()
        .map(|path| DownloadRequest {
            path: path.clone(),
            repo: repo.clone(),
        })
        .collect();
    print_json(&engine.download_files(&requests).await)
}

pub async fn search_code(
    config: ClientConfig,
    owner: &str,
    repo: &str,
    query: &str,
    extension: Option<&str>,
) -> Result<()> {
    let engine = build_engine(config)?;
    let repo = RepositoryRef::new(owner, repo, None);
    print_json(&engine.search_code(&repo, query, extension).await?)
}
