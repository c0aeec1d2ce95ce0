//! Review routes: question, query and synonym generation plus PRISMA export.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::llm::LlmChat;
use crate::prisma::{self, DIAGRAM_FILE_NAME, PrismaError, ReviewCounts};
use crate::services::synonyms::{ReviewContext, SynonymGroup};
use crate::services::{ReviewError, query, questions, synonyms};
use crate::state::AppState;

fn require_llm(state: &AppState) -> Result<Arc<dyn LlmChat>, ApiError> {
    state.llm.clone().ok_or_else(|| ReviewError::LlmNotConfigured.into())
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| ApiError::bad_request(e.body_text()))
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub answers: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SynonymsRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Value>,
    #[serde(default)]
    pub answers: Map<String, Value>,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SynonymsResponse {
    pub synonym_groups: Vec<SynonymGroup>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /generate_questions`: follow-up questions for a description.
pub async fn generate_questions(
    State(state): State<AppState>,
    _auth: AuthUser,
    payload: Result<Json<QuestionsRequest>, JsonRejection>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let req = json_body(payload)?;
    let llm = require_llm(&state)?;
    let questions = questions::generate_questions(llm.as_ref(), &state.models.questions, &req.query).await?;
    Ok(Json(QuestionsResponse { questions }))
}

/// `POST /generate_pubmed_query`: PubMed query from description and answers.
pub async fn generate_pubmed_query(
    State(state): State<AppState>,
    _auth: AuthUser,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let req = json_body(payload)?;
    let llm = require_llm(&state)?;
    let query = query::generate_pubmed_query(llm.as_ref(), &state.models.query, &req.query, &req.answers).await?;
    Ok(Json(QueryResponse { query }))
}

/// `POST /generate_synonyms`: synonym groups for each concept of a query.
pub async fn generate_synonyms(
    State(state): State<AppState>,
    _auth: AuthUser,
    payload: Result<Json<SynonymsRequest>, JsonRejection>,
) -> Result<Json<SynonymsResponse>, ApiError> {
    let req = json_body(payload)?;
    let llm = require_llm(&state)?;
    let ctx = ReviewContext { description: &req.description, questions: &req.questions, answers: &req.answers };
    let synonym_groups = synonyms::generate_synonyms(llm.as_ref(), &state.models.synonyms, &ctx, &req.query).await?;
    Ok(Json(SynonymsResponse { synonym_groups }))
}

/// `GET /test_synonyms`: liveness probe for the synonym route group.
pub async fn test_synonyms() -> Json<Value> {
    Json(serde_json::json!({ "message": "Synonym route is working" }))
}

/// `POST /export_prisma`: render the PRISMA diagram and return it as PNG.
pub async fn export_prisma(State(state): State<AppState>, _auth: AuthUser, body: Bytes) -> Result<Response, ApiError> {
    let counts = ReviewCounts::from_json_slice(&body).map_err(PrismaError::from)?;
    let output_dir: PathBuf = state.config.output_dir.clone();

    // The response carries the bytes this request encoded. The shared file
    // may already hold a concurrent request's diagram.
    let (path, png) = tokio::task::spawn_blocking(move || {
        let png = prisma::encode_diagram(&counts)?;
        let path = prisma::write_diagram(&output_dir, &png)?;
        Ok::<_, PrismaError>((path, png))
    })
    .await
    .map_err(|e| ApiError::internal(format!("export task failed: {e}")))??;

    tracing::info!(path = %path.display(), bytes = png.len(), "prisma diagram exported");

    let disposition = format!("attachment; filename=\"{DIAGRAM_FILE_NAME}\"");
    Ok(([(header::CONTENT_TYPE, "image/png".to_owned()), (header::CONTENT_DISPOSITION, disposition)], png).into_response())
}

#[cfg(test)]
#[path = "review_test.rs"]
mod tests;
