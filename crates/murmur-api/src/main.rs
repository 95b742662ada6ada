//! Murmur API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p murmur-api
//! ```
//!
//! Configuration is loaded from environment variables (with `.env` support).

use murmur_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Server failed to start: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing for the configured environment
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.server.port,
        "Configuration loaded"
    );

    // Run the server
    murmur_api::run(config).await?;

    Ok(())
}
