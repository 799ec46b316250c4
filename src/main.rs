//! Cinema booking service server.
//!
//! Binds the HTTP boundary over the in-process entity store and runs until
//! interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! # or with overrides:
//! PORT=4000 RUST_LOG=debug cargo run
//! ```

use cinema_booking::{build_router, AppState, Config, Hall, Store};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cinema_booking=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🎬 Starting cinema booking service...");

    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        lock_timeout_ms = config.store.lock_timeout_ms,
        "Configuration loaded"
    );

    let store = Arc::new(Store::new(Duration::from_millis(config.store.lock_timeout_ms)));
    if config.seed_demo_halls {
        seed_demo_halls(&store).await;
    }

    let state = AppState::new(store);
    let router = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "🎬 Cinema booking service is running");
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

/// Seed the hall set the service offers out of the box.
///
/// Halls are fixed, externally-provisioned resources from the booking core's
/// point of view; this stands in for that provisioning step.
async fn seed_demo_halls(store: &Store) {
    for (name, capacity) in [("Hall 1", 50), ("Hall 2", 80), ("Hall 3", 120)] {
        let hall = Hall::new(name, capacity);
        tracing::info!(hall_id = %hall.id, name, capacity, "hall seeded");
        store.insert_hall(hall).await;
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(err) => tracing::error!(%err, "failed to listen for shutdown signal"),
    }
}
