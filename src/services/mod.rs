pub mod auth;
pub mod list_parse;
pub mod query;
pub mod questions;
pub mod session;
pub mod synonyms;

use crate::error::ErrorCode;
use crate::llm::types::LlmError;

/// Errors from the review-assistant services.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("{0} is required")]
    EmptyInput(&'static str),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl ErrorCode for ReviewError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::EmptyInput(_) => "E_EMPTY_INPUT",
            Self::Llm(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}
