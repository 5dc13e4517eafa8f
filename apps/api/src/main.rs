mod chart;
mod config;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod models;
mod profile;
mod routes;
mod search;
mod settings;
mod state;
#[cfg(test)]
mod test_support;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::profile::ClaudeProfileExtractor;
use crate::routes::build_router;
use crate::search::client::TheirStackClient;
use crate::state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    let profile_extractor = Arc::new(
        ClaudeProfileExtractor::new(config.anthropic_api_url.clone())
            .map_err(|e| anyhow::anyhow!("failed to build resume analyzer: {e}"))?,
    );
    info!("Resume analysis via {} (model: {})", config.anthropic_api_url, llm_client::MODEL);

    let job_source = Arc::new(
        TheirStackClient::new(config.theirstack_api_url.clone())
            .map_err(|e| anyhow::anyhow!("failed to build job search client: {e}"))?,
    );
    info!("Job search via {}", config.theirstack_api_url);

    if config.anthropic_api_key.is_none() || config.theirstack_api_key.is_none() {
        info!("API keys not fully configured; set them from the settings page");
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let state = AppState::new(config, profile_extractor, job_source);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
