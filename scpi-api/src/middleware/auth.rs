//! JWT authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use scpi_security::{Role, UserId};

use crate::auth::{Claims, extract_bearer_token};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller resolved from a valid bearer token with an open session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID
    pub user_id: UserId,
    /// User e-mail
    pub email: String,
    /// Granted roles
    pub roles: Vec<Role>,
    /// Session backing the token
    pub session_id: String,
}

impl AuthenticatedUser {
    /// Creates an authenticated user from claims.
    pub fn from_claims(claims: Claims) -> Result<Self, ApiError> {
        let user_id = claims
            .sub
            .parse::<u64>()
            .map(UserId::new)
            .map_err(|_| ApiError::Unauthorized("Invalid authentication token subject".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            roles: claims.roles,
            session_id: claims.jti,
        })
    }
}

/// Authentication middleware function.
///
/// Rejects the request with 401 unless the token verifies, its session is
/// still open and the account still exists.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, &request) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            debug!(error = %err, "Authentication rejected");
            err.into_response()
        }
    }
}

fn authenticate(state: &AppState, request: &Request<Body>) -> Result<AuthenticatedUser, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".to_string()))?;

    let token = extract_bearer_token(auth_header).ok_or_else(|| {
        ApiError::Unauthorized("Invalid authentication header format".to_string())
    })?;

    let user = AuthenticatedUser::from_claims(state.jwt_manager.validate_token(token)?)?;

    let session = state.sessions.validate_session(&user.session_id)?;
    if session.user_id() != user.user_id {
        return Err(ApiError::Unauthorized(
            "Invalid authentication: session does not match token".to_string(),
        ));
    }

    if state.users.find_by_id(user.user_id).is_none() {
        return Err(ApiError::Unauthorized(
            "Invalid authentication: unknown user".to_string(),
        ));
    }

    Ok(user)
}

/// Extractor for authenticated user.
#[derive(Debug, Clone)]
pub struct Auth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::Unauthorized("Missing authentication".to_string()))
    }
}
