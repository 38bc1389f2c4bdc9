mod config;
mod errors;
mod llm_client;
mod money;
mod preferences;
mod prompt;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::recommendation::advisor::AdvisorSettings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PC build advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let llm = OpenAiClient::new(config.llm.clone())?;
    info!(
        "Completion client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.llm.api_url
    );

    let static_dir = config.static_dir.as_deref().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            warn!("STATIC_DIR {} is not a directory; front-end will not be served", dir.display());
        }
        exists
    });

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        advisor: AdvisorSettings::from_config(&config),
    };

    // Build router
    let app = build_router(state, static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
