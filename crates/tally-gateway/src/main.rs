//! Tally gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tally-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use tally_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Tally gateway...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        store = ?config.store.backend,
        dev_guild = ?config.dev.guild_id,
        "Configuration loaded"
    );

    tally_gateway::run(config).await?;

    Ok(())
}
