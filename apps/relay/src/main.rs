//! # Price Checker Relay
//!
//! Serves product images (with placeholder fallback) and forwards inventory
//! API calls for the kiosk page.
//!
//! ## Usage
//! ```text
//! pricecheck-relay [path/to/kiosk.toml]
//!
//! RUST_LOG=debug PRICECHECK_RELAY_PORT=8080 pricecheck-relay
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pricecheck_lookup::KioskConfig;
use pricecheck_relay::{build_router, RelayState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pricecheck=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting price checker relay...");

    // Load configuration
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = KioskConfig::load(config_path.as_deref())?;
    info!(
        inventory = %config.inventory.base_url,
        images = %config.images.base_url,
        placeholder = %config.images.placeholder,
        "Configuration loaded"
    );

    let state = Arc::new(RelayState::from_config(&config)?);
    let app = build_router(state);

    let bind_addr = config.relay.bind_address();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
