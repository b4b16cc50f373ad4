//! Command implementations

mod config;
mod posts;
mod report;
mod services;
mod space;
mod spaces;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use cowork_client::HttpDirectoryClient;
use cowork_core::config::{ClientConfig, ClientOverrides, CONFIG_PATH_VAR};
use std::path::PathBuf;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Config => config::execute(&config, &output),
        Commands::Spaces(args) => spaces::execute(args, &client(&config)?, &output).await,
        Commands::Space(args) => space::execute(args, &client(&config)?, &output).await,
        Commands::Services(args) => services::execute(args, &client(&config)?, &output).await,
        Commands::Posts(args) => posts::execute(args, &client(&config)?, &output).await,
        Commands::Report(args) => report::execute(args, &client(&config)?, &output).await,
    }
}

/// Layer defaults, the config file, environment variables and CLI flags
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::with_defaults();

    let file = cli
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_PATH_VAR).ok().filter(|p| !p.is_empty()).map(PathBuf::from));
    if let Some(path) = file {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(ClientOverrides {
        api_url: cli.api_url.clone(),
        api_key: cli.api_key.clone(),
        timeout_secs: cli.timeout,
        retries: cli.retries,
    });

    tracing::debug!(api_url = %config.api_url.value, "Resolved client configuration");
    Ok(config)
}

fn client(config: &ClientConfig) -> Result<HttpDirectoryClient> {
    HttpDirectoryClient::from_config(config).context("Invalid API URL")
}
