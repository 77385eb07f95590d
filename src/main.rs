//! Trackrelay tracking-webhook relay service.
//!
//! Main entry point. Initializes tracing, loads configuration, builds the
//! outbound client, and serves the webhook endpoint until shutdown.

use anyhow::Result;
use tracing::info;
use trackrelay_api::{start_server, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting trackrelay webhook relay service");

    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        server_addr = %addr,
        appsheet_app_id = %config.appsheet_app_id,
        appsheet_base_url = %config.appsheet_base_url,
        "Configuration loaded"
    );

    let state = AppState::new(config)?;

    info!(addr = %addr, "Trackrelay is ready to receive webhooks");
    start_server(state, addr).await?;

    info!("Trackrelay shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,trackrelay=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
