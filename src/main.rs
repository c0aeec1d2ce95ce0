mod config;
mod error;
mod llm;
mod prisma;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid server configuration");
    if config.credentials.is_none() {
        tracing::warn!("AUTH_USERNAME not set — token endpoint disabled");
    }

    // Initialize LLM client (non-fatal: review assistant disabled if config missing).
    let (llm, models) = match llm::config::LlmConfig::from_env().and_then(llm::LlmClient::from_config) {
        Ok(client) => {
            let models = client.models().clone();
            tracing::info!(provider = ?client.provider(), questions = %models.questions, query = %models.query, synonyms = %models.synonyms, "LLM client initialized");
            (Some(Arc::new(client) as Arc<dyn LlmChat>), models)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured — review assistant disabled");
            (None, llm::config::TaskModels::default())
        }
    };

    let port = config.port;
    let output_dir = config.output_dir.clone();
    let state = state::AppState::new(config, llm, models);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, output_dir = %output_dir.display(), "litreview listening");
    axum::serve(listener, app).await.expect("server failed");
}
