//! LLM: prompt/response client for the review assistant.
//!
//! DESIGN
//! ======
//! Callers depend on the [`LlmChat`] trait only. [`LlmClient`] is the
//! concrete implementation: an in-process HTTP client for OpenAI-compatible
//! chat-completions endpoints, built once from an explicit [`LlmConfig`].
//! Failures are returned as typed [`LlmError`]s and never retried.

pub mod config;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind, TaskModels};
pub use types::LlmChat;
use types::{Completion, CompletionOptions, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client for Mistral or OpenAI.
pub struct LlmClient {
    inner: openai::ChatCompletionsClient,
    provider: LlmProviderKind,
    models: TaskModels,
}

impl LlmClient {
    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner =
            openai::ChatCompletionsClient::new(config.api_key, config.base_url, config.provider, config.timeouts)?;
        Ok(Self { inner, provider: config.provider, models: config.models })
    }

    #[must_use]
    pub fn provider(&self) -> LlmProviderKind {
        self.provider
    }

    /// Models configured for each review task.
    #[must_use]
    pub fn models(&self) -> &TaskModels {
        &self.models
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<Completion, LlmError> {
        let completion = self.inner.complete(prompt, options).await?;
        tracing::debug!(
            model = %completion.model,
            finish_reason = %completion.finish_reason,
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "llm completion"
        );
        Ok(completion)
    }
}
