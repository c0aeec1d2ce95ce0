use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_code_per_variant() {
    let cases = [
        (LlmError::ConfigParse("bad".into()), "E_CONFIG_PARSE"),
        (LlmError::MissingApiKey { var: "KEY".into() }, "E_MISSING_API_KEY"),
        (LlmError::ApiRequest("timeout".into()), "E_API_REQUEST"),
        (LlmError::ApiResponse { status: 500, body: "oops".into() }, "E_API_RESPONSE"),
        (LlmError::ApiParse("json".into()), "E_API_PARSE"),
        (LlmError::HttpClientBuild("tls".into()), "E_HTTP_CLIENT_BUILD"),
    ];
    for (err, code) in cases {
        assert_eq!(err.error_code(), code, "{err}");
    }
}

#[test]
fn error_code_auth_statuses() {
    assert_eq!(LlmError::ApiResponse { status: 401, body: String::new() }.error_code(), "E_API_AUTH");
    assert_eq!(LlmError::ApiResponse { status: 403, body: String::new() }.error_code(), "E_API_AUTH");
}

// =============================================================================
// LlmError::retryable
// =============================================================================

#[test]
fn retryable_transport_and_throttling() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::ApiParse("json".into()).retryable());
    assert!(!LlmError::MissingApiKey { var: "KEY".into() }.retryable());
}

#[test]
fn missing_api_key_message_names_variable() {
    let err = LlmError::MissingApiKey { var: "MISTRAL_API_KEY".into() };
    assert_eq!(err.to_string(), "missing API key: env var MISTRAL_API_KEY not set");
}
