//! # Geoshare
//!
//! A real-time location sharing client implemented in Rust.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Presence server transport
//! - The location sync session

use anyhow::Result;
use tracing::info;

use geoshare::config::Settings;
use geoshare::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    geoshare::telemetry::init_tracing();

    info!("Starting Geoshare client...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        server = %settings.server.url,
        source = %settings.geolocation.source,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings)?;

    info!("Session ready, reporting location");
    application.run_until_stopped().await?;

    Ok(())
}
