//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed server config, the optional LLM client with its
//! per-task model names, and the in-memory bearer-token store.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::config::TaskModels;
use crate::llm::types::LlmChat;
use crate::services::session::SessionStore;

/// Shared application state. Clone is required by Axum; every field is
/// `Arc`-wrapped or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub models: TaskModels,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, llm: Option<Arc<dyn LlmChat>>, models: TaskModels) -> Self {
        let sessions = SessionStore::new(config.token_ttl);
        Self { config: Arc::new(config), llm, models, sessions }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::types::{Completion, CompletionOptions, LlmError};
    use crate::services::auth::Credentials;

    pub const TEST_USERNAME: &str = "reviewer";
    pub const TEST_PASSWORD: &str = "hunter2";

    /// Scripted LLM that replays canned replies and records every call.
    pub struct MockLlm {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        pub calls: Mutex<Vec<(String, CompletionOptions)>>,
    }

    impl MockLlm {
        #[must_use]
        pub fn new(replies: Vec<&str>) -> Self {
            Self::with_results(replies.into_iter().map(|r| Ok(r.to_owned())).collect())
        }

        #[must_use]
        pub fn with_results(replies: Vec<Result<String, LlmError>>) -> Self {
            Self { replies: Mutex::new(replies), calls: Mutex::new(Vec::new()) }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }

        pub fn options(&self) -> Vec<CompletionOptions> {
            self.calls.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<Completion, LlmError> {
            self.calls.lock().unwrap().push((prompt.to_owned(), options.clone()));
            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.is_empty() { Ok(String::new()) } else { replies.remove(0) };
            reply.map(|text| Completion {
                text,
                model: options.model.clone(),
                finish_reason: "stop".into(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    fn test_config(output_dir: &Path) -> AppConfig {
        AppConfig {
            output_dir: output_dir.to_path_buf(),
            credentials: Some(Credentials::from_password(TEST_USERNAME, TEST_PASSWORD)),
            ..AppConfig::default()
        }
    }

    /// Create a test `AppState` with no LLM client.
    #[must_use]
    pub fn test_app_state(output_dir: &Path) -> AppState {
        AppState::new(test_config(output_dir), None, TaskModels::default())
    }

    /// Create a test `AppState` with a mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(output_dir: &Path, llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(test_config(output_dir), Some(llm), TaskModels::default())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
