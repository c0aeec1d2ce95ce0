use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_to_mistral() {
    let config = LlmConfig::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "k")])).unwrap();
    assert_eq!(config.provider, LlmProviderKind::Mistral);
    assert_eq!(config.api_key, "k");
    assert_eq!(config.base_url, DEFAULT_MISTRAL_BASE_URL);
    assert_eq!(config.models, TaskModels::default());
    assert_eq!(config.models.questions, "open-mistral-7b");
    assert_eq!(config.models.query, "mistral-large-latest");
    assert_eq!(config.models.synonyms, "mistral-small-latest");
    assert_eq!(config.timeouts.request_secs, DEFAULT_LLM_REQUEST_TIMEOUT_SECS);
    assert_eq!(config.timeouts.connect_secs, DEFAULT_LLM_CONNECT_TIMEOUT_SECS);
}

#[test]
fn openai_provider_uses_its_defaults() {
    let config =
        LlmConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk")])).unwrap();
    assert_eq!(config.provider, LlmProviderKind::OpenAi);
    assert_eq!(config.base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(config.models.query, "gpt-4o");
}

#[test]
fn unknown_provider_is_rejected() {
    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "claude")])).unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(ref m) if m == "unknown LLM_PROVIDER: claude"));
}

#[test]
fn missing_or_blank_key_is_rejected() {
    let err = LlmConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "MISTRAL_API_KEY"));

    let err = LlmConfig::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "   ")])).unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { .. }));
}

#[test]
fn api_key_env_indirection() {
    let config =
        LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "MY_KEY"), ("MY_KEY", "secret")])).unwrap();
    assert_eq!(config.api_key, "secret");

    let err = LlmConfig::from_lookup(lookup_from(&[("LLM_API_KEY_ENV", "MY_KEY"), ("MISTRAL_API_KEY", "k")]))
        .unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "MY_KEY"));
}

#[test]
fn base_url_trailing_slash_trimmed() {
    let config = LlmConfig::from_lookup(lookup_from(&[
        ("MISTRAL_API_KEY", "k"),
        ("LLM_BASE_URL", "http://localhost:8080/v1/"),
    ]))
    .unwrap();
    assert_eq!(config.base_url, "http://localhost:8080/v1");
}

#[test]
fn per_task_models_override_shared_model() {
    let config = LlmConfig::from_lookup(lookup_from(&[
        ("MISTRAL_API_KEY", "k"),
        ("LLM_MODEL", "shared"),
        ("LLM_QUERY_MODEL", "big"),
    ]))
    .unwrap();
    assert_eq!(config.models.questions, "shared");
    assert_eq!(config.models.query, "big");
    assert_eq!(config.models.synonyms, "shared");
}

#[test]
fn timeouts_parse_with_fallback() {
    let config = LlmConfig::from_lookup(lookup_from(&[
        ("MISTRAL_API_KEY", "k"),
        ("LLM_REQUEST_TIMEOUT_SECS", "30"),
        ("LLM_CONNECT_TIMEOUT_SECS", "soon"),
    ]))
    .unwrap();
    assert_eq!(config.timeouts.request_secs, 30);
    assert_eq!(config.timeouts.connect_secs, DEFAULT_LLM_CONNECT_TIMEOUT_SECS);
}

#[test]
fn debug_redacts_api_key() {
    let config = LlmConfig::from_lookup(lookup_from(&[("MISTRAL_API_KEY", "super-secret")])).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("<redacted>"));
}
