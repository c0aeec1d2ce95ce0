//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the review-assistant JSON endpoints, the token login
//! flow and the PRISMA export under a single Axum router. The export output
//! directory is served read-only at `/static`.

pub mod auth;
pub mod review;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.output_dir);

    Router::new()
        .route("/token", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/generate_questions", post(review::generate_questions))
        .route("/generate_pubmed_query", post(review::generate_pubmed_query))
        .route("/generate_synonyms", post(review::generate_synonyms))
        .route("/test_synonyms", get(review::test_synonyms))
        .route("/export_prisma", post(review::export_prisma))
        .route("/healthz", get(healthz))
        .nest_service("/static", static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
