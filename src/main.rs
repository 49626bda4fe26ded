mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_scout=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();

    match cli.command {
        Commands::Serve => {
            cli::run_mcp_server(config).await?;
        }
        Commands::Find {
            owner,
            repo,
            pattern,
            branch,
            max_results,
        } => {
            cli::find_files(config, &owner, &repo, &pattern, branch, max_results).await?;
        }
        Commands::Download {
            owner,
            repo,
            paths,
            branch,
        } => {
            cli::download_files(config, &owner, &repo, &paths, branch).await?;
        }
        Commands::Search {
            owner,
            repo,
            query,
            extension,
        } => {
            cli::search_code(config, &owner, &repo, &query, extension.as_deref()).await?;
        }
    }

    Ok(())
}
