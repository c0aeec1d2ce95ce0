//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Mistral,
    OpenAi,
}

impl LlmProviderKind {
    fn default_key_var(self) -> &'static str {
        match self {
            Self::Mistral => "MISTRAL_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::Mistral => DEFAULT_MISTRAL_BASE_URL,
            Self::OpenAi => DEFAULT_OPENAI_BASE_URL,
        }
    }

    fn default_models(self) -> TaskModels {
        match self {
            Self::Mistral => TaskModels {
                questions: "open-mistral-7b".into(),
                query: "mistral-large-latest".into(),
                synonyms: "mistral-small-latest".into(),
            },
            Self::OpenAi => TaskModels {
                questions: "gpt-4o-mini".into(),
                query: "gpt-4o".into(),
                synonyms: "gpt-4o-mini".into(),
            },
        }
    }
}

/// Model used for each review-assistant task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskModels {
    pub questions: String,
    pub query: String,
    pub synonyms: String,
}

impl Default for TaskModels {
    fn default() -> Self {
        LlmProviderKind::Mistral.default_models()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub models: TaskModels,
    pub timeouts: LlmTimeouts,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Optional:
    /// - `LLM_PROVIDER`: `mistral` (default) or `openai`
    /// - `LLM_API_KEY_ENV`: names the env var holding the key
    ///   (default `MISTRAL_API_KEY` / `OPENAI_API_KEY`)
    /// - `LLM_BASE_URL`: provider default when absent
    /// - `LLM_MODEL`: one model for every task
    /// - `LLM_QUESTIONS_MODEL`, `LLM_QUERY_MODEL`, `LLM_SYNONYMS_MODEL`:
    ///   per-task overrides, taking precedence over `LLM_MODEL`
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider or a missing API key.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider or a missing API key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let provider = parse_provider(lookup("LLM_PROVIDER").as_deref())?;

        let key_var = lookup("LLM_API_KEY_ENV").unwrap_or_else(|| provider.default_key_var().to_string());
        let api_key = lookup(&key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey { var: key_var })?;

        let base_url = lookup("LLM_BASE_URL")
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let mut models = provider.default_models();
        if let Some(all) = lookup("LLM_MODEL") {
            models = TaskModels { questions: all.clone(), query: all.clone(), synonyms: all };
        }
        if let Some(m) = lookup("LLM_QUESTIONS_MODEL") {
            models.questions = m;
        }
        if let Some(m) = lookup("LLM_QUERY_MODEL") {
            models.query = m;
        }
        if let Some(m) = lookup("LLM_SYNONYMS_MODEL") {
            models.synonyms = m;
        }

        let timeouts = LlmTimeouts {
            request_secs: parse_u64(&lookup, "LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, "LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { provider, api_key, base_url, models, timeouts })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_provider(raw: Option<&str>) -> Result<LlmProviderKind, LlmError> {
    match raw.unwrap_or("mistral") {
        "mistral" => Ok(LlmProviderKind::Mistral),
        "openai" => Ok(LlmProviderKind::OpenAi),
        other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
