//! Auth routes: password login for a bearer token, and logout.

use axum::Form;
use axum::RequestPartsExt;
use axum::extract::{FromRef, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::auth::AuthError;
use crate::services::session::SessionUser;
use crate::state::AppState;

/// 401 with the `WWW-Authenticate: Bearer` challenge.
fn unauthorized(err: ApiError) -> Response {
    ([(header::WWW_AUTHENTICATE, "Bearer")], err).into_response()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| unauthorized(ApiError::unauthorized("missing bearer token")))?;

        let app_state = AppState::from_ref(state);
        let token = bearer.token();
        let user = app_state
            .sessions
            .validate_session(token)
            .await
            .ok_or_else(|| unauthorized(ApiError::unauthorized("invalid or expired token")))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// `POST /token`: exchange form credentials for a bearer token.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let Some(credentials) = &state.config.credentials else {
        return ApiError::from(AuthError::NotConfigured).into_response();
    };

    if let Err(e) = credentials.verify(&form.username, &form.password) {
        tracing::warn!(username = %form.username, "login rejected");
        return unauthorized(e.into());
    }

    let access_token = state.sessions.create_session(&credentials.username).await;
    tracing::info!(username = %credentials.username, "token issued");
    Json(TokenResponse { access_token, token_type: "bearer".into() }).into_response()
}

/// `POST /logout`: revoke the presented token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    state.sessions.delete_session(&auth.token).await;
    tracing::info!(username = %auth.user.username, "token revoked");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
