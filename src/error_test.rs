use super::*;
use crate::llm::types::LlmError;
use crate::prisma::InvalidCounts;

async fn body_json(err: ApiError) -> serde_json::Value {
    let response = err.into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn invalid_counts_are_bad_request() {
    let err: ApiError = PrismaError::from(InvalidCounts::Malformed("eof".into())).into();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "E_INVALID_COUNTS");
}

#[test]
fn render_and_io_failures_are_internal() {
    let render: ApiError = PrismaError::Render("svg parse".into()).into();
    assert_eq!(render.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(render.code, "E_RENDER");

    let io: ApiError =
        PrismaError::io(std::path::Path::new("static"), std::io::Error::other("disk full")).into();
    assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(io.code, "E_IO");
    assert!(io.message.contains("static"));
}

#[test]
fn llm_failures_are_service_unavailable() {
    let missing: ApiError = ReviewError::LlmNotConfigured.into();
    assert_eq!(missing.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(missing.code, "E_LLM_NOT_CONFIGURED");

    let upstream: ApiError = ReviewError::from(LlmError::ApiResponse { status: 502, body: String::new() }).into();
    assert_eq!(upstream.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(upstream.code, "E_API_RESPONSE");
    assert!(upstream.retryable);

    let auth: ApiError = ReviewError::from(LlmError::ApiResponse { status: 401, body: String::new() }).into();
    assert_eq!(auth.code, "E_API_AUTH");
    assert!(!auth.retryable);
}

#[test]
fn empty_input_is_bad_request() {
    let err: ApiError = ReviewError::EmptyInput("query").into();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "query is required");
}

#[test]
fn auth_errors_map_to_status() {
    let invalid: ApiError = AuthError::InvalidCredentials.into();
    assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    let unconfigured: ApiError = AuthError::NotConfigured.into();
    assert_eq!(unconfigured.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn response_body_has_error_envelope() {
    let status = ApiError::bad_request("bad").status;
    let body = body_json(ApiError::bad_request("bad")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E_BAD_REQUEST");
    assert_eq!(body["error"]["message"], "bad");
    assert_eq!(body["error"]["retryable"], false);
}
