mod ats;
mod config;
mod errors;
mod formatting;
mod generation;
mod models;
mod providers;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvtailor API v{}", env!("CARGO_PKG_VERSION"));

    // Build every backend once; requests share the registry read-only
    let state = AppState::new(config.clone())?;
    info!(
        "Providers registered: {} (default: {})",
        state
            .registry
            .list()
            .iter()
            .map(|p| p.id)
            .collect::<Vec<_>>()
            .join(", "),
        state.registry.default_id()
    );
    if config.openai.api_key.is_none() {
        info!("OPENAI_API_KEY not set; the openai provider will fail until it is configured");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
