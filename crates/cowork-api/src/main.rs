use std::sync::Arc;

use anyhow::Context;
use cowork_core::config::ServerConfig;
use cowork_store::open_store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cowork_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cowork_api=info,cowork_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("Failed to load server configuration")?;

    tracing::info!(
        port = config.port.value,
        environment = ?config.environment.value,
        base_path = config.base_path.value.as_deref().unwrap_or("/"),
        "Starting coworking directory API"
    );

    let selection = open_store(&config).await;
    if let Some(reason) = &selection.fallback_reason {
        tracing::warn!(
            "Serving fixture data instead of the configured tables ({}).\n\
            Remediation:\n\
            1. Set DATABASE_URL, COWORK_SPACES_TABLE, COWORK_PRICING_TABLE and COWORK_SERVICES_TABLE\n\
            2. Ensure PostgreSQL is running and reachable",
            reason
        );
    }
    tracing::info!(storage = %selection.backend, "Storage ready");

    let state = Arc::new(AppState::from_selection(selection));
    let app = create_router(state, config.base_path.value.as_deref());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for any origin");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
