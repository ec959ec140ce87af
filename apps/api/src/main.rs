mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod optimizer;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::optimizer::generative::LlmOptimizer;
use crate::optimizer::orchestrator::Orchestrator;
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

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Generative backend only when an API key is configured
    let orchestrator = match &config.anthropic_api_key {
        Some(api_key) => {
            let llm = LlmClient::new(api_key.clone()).context("Failed to build LLM client")?;
            info!("Generative optimizer enabled (model: {})", llm_client::MODEL);
            Orchestrator::with_generative(Arc::new(LlmOptimizer::new(Arc::new(llm))))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; using rule-based optimizer only");
            Orchestrator::rule_based()
        }
    };

    info!("Upload limit: {} bytes", config.max_upload_bytes);

    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
