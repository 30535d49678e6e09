//! Flight Delay API - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("Failed to load configuration")?;
    init_logging(&config)?;

    info!("=== Flight Delay API v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Serving model from {}", config.model_path);

    run_server(config).await
}
