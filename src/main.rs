//! Congo server - Unified CLI

use anyhow::Result;
use clap::Parser;
use congo_server::cli::{Cli, Command};
use congo_server::{GameRepository, ServerConfig, serve};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let config = ServerConfig::load_or_default(&config)?.with_overrides(host, port, db_path);
            info!(?config, "Starting Congo server");
            serve(config).await
        }
        Command::Migrate { config, db_path } => {
            let config = ServerConfig::load_or_default(&config)?.with_overrides(None, None, db_path);
            migrate(&config)
        }
    }
}

/// Apply pending migrations to the configured database.
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn migrate(config: &ServerConfig) -> Result<()> {
    let repository = GameRepository::new(config.db_path().clone())?;
    let applied = repository.run_migrations()?;
    info!(applied, "Database is up to date");
    Ok(())
}
