mod config;
mod errors;
mod extract;
mod llm;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{BackendKind, Config};
use crate::llm::{LlmBackend, OllamaClient, OpenAiChatClient};
use crate::routes::build_router;
use crate::screening::pipeline::EvaluationPipeline;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener API v{}", env!("CARGO_PKG_VERSION"));

    // Construct the LLM backend selected by configuration
    let llm: Arc<dyn LlmBackend> = match config.backend {
        BackendKind::Ollama => Arc::new(OllamaClient::new(config.llm.clone())?),
        BackendKind::OpenAi => Arc::new(OpenAiChatClient::new(config.llm.clone())?),
    };
    info!(
        "LLM backend initialized ({:?}, model: {})",
        config.backend,
        llm.model_id()
    );

    // Build the evaluation pipeline and app state
    let pipeline = EvaluationPipeline::new(llm);
    let state = AppState {
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
