use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobtrack_api::config::Config;
use jobtrack_api::db::create_pool;
use jobtrack_api::llm_client::{self, LlmClient};
use jobtrack_api::routes::build_router;
use jobtrack_api::state::AppState;
use jobtrack_api::store::postgres::PgRecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jobtrack_api={level},{bin}={level}",
                level = &config.rust_log,
                bin = env!("CARGO_CRATE_NAME"),
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job tracker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), &config.anthropic_base_url)?;
    info!(
        "LLM client initialized (model: {}, upstream: {})",
        llm_client::MODEL,
        config.anthropic_base_url
    );
    info!("Extraction clients should target {}", config.relay_base_url);

    let state = AppState {
        store: Arc::new(PgRecordStore::new(db)),
        llm,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
