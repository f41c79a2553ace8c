mod assistant;
mod config;
mod errors;
mod models;
mod profile;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::AssistantGateway;
use crate::config::Config;
use crate::profile::ProfileProvider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Resolve the profile snapshot once; it lives for the whole process.
    let provider =
        ProfileProvider::from_config(&config.cms).context("Failed to build CMS client")?;
    let loaded = provider.load().await;
    info!("Profile snapshot ready (origin: {:?})", loaded.origin);

    let assistant = AssistantGateway::from_config(&config.assistant, loaded.data.clone())
        .context("Failed to build generation client")?;
    info!(
        "Assistant gateway initialized (model: {}, mode: {:?}, online: {})",
        config.assistant.model,
        config.assistant.client_mode,
        assistant.is_online()
    );

    let state = AppState {
        profile: loaded.data,
        profile_origin: loaded.origin,
        assistant,
    };

    // The SPA is served from a static host on another origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
