//! fcache - Entry Point
//!
//! Maintenance binary: loads configuration, builds the application context
//! the same way a service would, and runs one command against its store.

use clap::Parser;
use fcache::bootstrap::init_app;
use fcache::cli::{Cli, execute};
use fcache::domain::ports::infrastructure::CacheStoreInterface;
use fcache::infrastructure::config::ConfigLoader;
use fcache::infrastructure::logging::init_logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    let app = init_app(config).await?;
    let store = app.store();
    info!(command = ?cli.command, mode = %store.mode(), "running maintenance command");

    let result = execute(store.as_ref(), &cli.command).await;
    app.shutdown().await;
    println!("{}", result?);
    Ok(())
}
