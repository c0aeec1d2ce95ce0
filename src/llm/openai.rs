//! OpenAI-compatible chat-completions client.
//!
//! Mistral and OpenAI share the `/chat/completions` wire format; they differ
//! only in the name of the sampling-seed field. Pure request building and
//! response parsing are kept as free functions for testability.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::{LlmProviderKind, LlmTimeouts};
use super::types::{Completion, CompletionOptions, LlmError};

pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    provider: LlmProviderKind,
}

impl ChatCompletionsClient {
    pub fn new(
        api_key: String,
        base_url: String,
        provider: LlmProviderKind,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, provider })
    }

    pub async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<Completion, LlmError> {
        let messages = [CcMessage { role: "user", content: prompt }];
        let body = build_request(self.provider, options, &messages);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_chat_completions_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CcRequest<'a> {
    model: &'a str,
    messages: &'a [CcMessage<'a>],
    temperature: f32,
    max_tokens: u32,
    /// Mistral's name for the sampling seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    random_seed: Option<u64>,
    /// OpenAI's name for the sampling seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

pub(crate) fn build_request<'a>(
    provider: LlmProviderKind,
    options: &'a CompletionOptions,
    messages: &'a [CcMessage<'a>],
) -> CcRequest<'a> {
    let (random_seed, seed) = match provider {
        LlmProviderKind::Mistral => (options.seed, None),
        LlmProviderKind::OpenAi => (None, options.seed),
    };
    CcRequest {
        model: &options.model,
        messages,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        random_seed,
        seed,
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<Completion, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let usage = root.get("usage");
    let input_tokens = usage
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop")
        .to_owned();

    let content = choice.get("message").and_then(|m| m.get("content"));
    let text = match content {
        Some(Value::String(s)) => s.clone(),
        // Some providers return content as a list of typed parts.
        Some(Value::Array(parts)) => parts
            .iter()
            .filter(|p| p.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect(),
        _ => return Err(LlmError::ApiParse("chat_completions: missing message content".to_string())),
    };

    Ok(Completion { text, model, finish_reason, input_tokens, output_tokens })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
