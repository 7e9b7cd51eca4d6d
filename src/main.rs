//! MedCodes server binary.
//!
//! Loads the code catalog once and serves the read-only REST API (with Swagger UI).

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medcodes_core::config::{catalog_path_from_env_value, data_dir_from_env_value};
use medcodes_core::CoreConfig;

/// Main entry point for the MedCodes server
///
/// # Environment Variables
/// - `MEDCODES_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDCODES_DATA_DIR`: Directory for persisted state (default: "medcodes_data")
/// - `MEDCODES_CATALOG`: Catalog JSON file to serve instead of the built-in catalog
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the catalog cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medcodes=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDCODES_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = CoreConfig::new(
        data_dir_from_env_value(std::env::var("MEDCODES_DATA_DIR").ok()),
        catalog_path_from_env_value(std::env::var("MEDCODES_CATALOG").ok()),
    )?;
    let catalog = Arc::new(cfg.load_catalog()?);
    if catalog.is_empty() {
        tracing::warn!("Code catalog is empty; /health will report not ok");
    }

    tracing::info!("++ Serving {} codes", catalog.len());
    tracing::info!("++ Starting MedCodes REST on {}", rest_addr);

    let app = router(AppState::new(catalog));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
