//! Account handlers: register, login, logout and current user.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Span, info};

use scpi_security::{UserId, UserProfile};
use scpi_telemetry::masking::{Sensitive, mask_email};
use scpi_telemetry::spans::auth_span;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Auth;
use crate::response::{CreatedResponse, EmptyResponse, SuccessResponse};
use crate::state::AppState;

/// Register and login request body. Absent fields are reported as missing.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    /// E-mail address
    #[serde(default)]
    pub email: Option<String>,
    /// Plain-text password
    #[serde(default)]
    pub password: Option<Sensitive<String>>,
}

impl CredentialsRequest {
    fn into_parts(self) -> (String, String) {
        (
            self.email.unwrap_or_default(),
            self.password.map(Sensitive::into_inner).unwrap_or_default(),
        )
    }
}

/// Body of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user id
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

/// Body of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
    /// Logged-in user
    pub user: UserProfile,
}

/// Body of `GET /api/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Current user
    pub user: UserProfile,
}

/// Create an account.
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<CreatedResponse<RegisterResponse>> {
    let Json(payload) = payload?;
    let (email, password) = payload.into_parts();
    let span = auth_span("register", &mask_email(&email));

    async move {
        // Hashing is CPU bound.
        let users = Arc::clone(&state.users);
        let profile = tokio::task::spawn_blocking(move || users.register(&email, &password))
            .await
            .map_err(|e| ApiError::Internal(format!("Registration task failed: {e}")))??;

        Span::current().record("user_id", profile.id.value());

        Ok(CreatedResponse::new(RegisterResponse {
            user_id: profile.id,
        }))
    }
    .instrument(span)
    .await
}

/// Exchange credentials for a bearer token.
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<SuccessResponse<LoginResponse>> {
    let Json(payload) = payload?;
    let (email, password) = payload.into_parts();
    let span = auth_span("login", &mask_email(&email));

    async move {
        let users = Arc::clone(&state.users);
        let profile = tokio::task::spawn_blocking(move || users.authenticate(&email, &password))
            .await
            .map_err(|e| ApiError::Internal(format!("Login task failed: {e}")))?
            .inspect_err(|e| info!(error = %e, "Login rejected"))?;

        let session = state.sessions.create_session(profile.id);
        let token = state.jwt_manager.generate_token(&profile, &session)?;

        Span::current().record("user_id", profile.id.value());
        info!("User logged in");

        Ok(SuccessResponse::new(LoginResponse {
            token,
            user: profile,
        }))
    }
    .instrument(span)
    .await
}

/// Revoke the caller's token.
///
/// POST /api/logout
pub async fn logout(State(state): State<Arc<AppState>>, Auth(user): Auth) -> EmptyResponse {
    let span = auth_span("logout", &mask_email(&user.email));
    span.record("user_id", user.user_id.value());
    span.in_scope(|| {
        state.sessions.invalidate_session(&user.session_id);
        info!("User logged out");
    });

    EmptyResponse::success()
}

/// Current user.
///
/// GET /api/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Auth(user): Auth,
) -> ApiResult<SuccessResponse<MeResponse>> {
    let profile = state
        .users
        .find_by_id(user.user_id)
        .ok_or_else(|| ApiError::Unauthorized("Invalid authentication: unknown user".to_string()))?;

    Ok(SuccessResponse::new(MeResponse { user: profile }))
}
