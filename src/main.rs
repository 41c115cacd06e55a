//! # HR Directory
//!
//! Application entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Durable store and search index backends
//! - HTTP server

use anyhow::Result;
use tracing::info;

use hr_directory::config::Settings;
use hr_directory::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    hr_directory::telemetry::init_tracing();

    info!("Starting HR Directory...");

    let settings = Settings::load()?;
    info!(
        address = %settings.server_addr(),
        environment = %settings.environment,
        store = ?settings.database.backend,
        search = ?settings.search.backend,
        update_policy = ?settings.service.update_policy,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
