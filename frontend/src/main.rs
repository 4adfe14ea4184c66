//! `articles` command-line entry point.

use std::sync::Arc;

use anyhow::Result;
use articles_core::{ArticlesApi, ClientConfig};
use articles_frontend::cli::{self, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }
    tracing::debug!(base_url = %config.base_url, update_method = %config.update_method, "configured");

    let api = Arc::new(ArticlesApi::from_config(&config));
    let output = cli::run(args.command, api).await?;
    print!("{output}");
    Ok(())
}
