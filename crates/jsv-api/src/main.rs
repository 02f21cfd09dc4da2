//! # jsv-api: Binary Entry Point
//!
//! Loads every `*.schema.json` file from `JSV_SCHEMA_DIR` and serves the
//! validation API on `PORT` (default 8080).

use jsv_api::middleware::metrics;
use jsv_api::state::{AppConfig, AppState};
use jsv_schema::ValidatorRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;

    let registry = ValidatorRegistry::new();
    if config.schema_dir.is_dir() {
        let loaded = registry.load_dir(&config.schema_dir).map_err(|e| {
            tracing::error!("Schema loading failed: {e}");
            e
        })?;
        tracing::info!(dir = %config.schema_dir.display(), loaded, "schemas loaded");
    } else {
        tracing::warn!(
            dir = %config.schema_dir.display(),
            "schema directory not found; starting with an empty registry"
        );
    }

    let handle = metrics::install_recorder()?;
    let state = AppState::new(registry)
        .with_gate_config(config.gate_config())
        .with_metrics(handle);

    let app = jsv_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("JSV API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
