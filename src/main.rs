use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{config_from_env, router, AppState, DEFAULT_REST_ADDR};

/// Main entry point for the MediQuery application
///
/// Resolves configuration once, then serves the REST API (analysis, credential diagnostic,
/// health and Swagger UI).
///
/// # Environment Variables
/// - `MEDIQUERY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `GROQ_API_KEY`: bearer credential for the completion service
/// - `MEDIQUERY_UPSTREAM_URL`, `MEDIQUERY_MODEL`, `MEDIQUERY_TEMPERATURE`,
///   `MEDIQUERY_UPSTREAM_TIMEOUT_SECS`: upstream overrides
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediquery=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDIQUERY_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = Arc::new(config_from_env()?);
    tracing::info!(
        "Upstream {} (model {}, credential configured: {})",
        cfg.upstream_url(),
        cfg.model(),
        cfg.has_api_key()
    );
    if !cfg.has_api_key() {
        tracing::warn!("GROQ_API_KEY is not set; upstream calls will be unauthenticated");
    }

    let app = router(AppState::from_config(cfg)?);

    tracing::info!("-- Starting MediQuery REST API on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
