//! JWT authentication module.
//!
//! Tokens are signed with HS256 and carry the user's id, e-mail, roles and
//! the id of the session opened at login (`jti`).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use scpi_security::{Role, Session, UserProfile};

use crate::config::JwtConfig;
use crate::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User e-mail
    pub email: String,
    /// Granted roles
    pub roles: Vec<Role>,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Session ID
    pub jti: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    expiration_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_secs", &self.expiration_secs)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Creates a new JWT manager from configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiration_secs: i64::try_from(config.expiration_secs).unwrap_or(i64::MAX),
        }
    }

    /// Token lifetime.
    #[must_use]
    pub fn expiration(&self) -> Duration {
        Duration::seconds(self.expiration_secs)
    }

    /// Generates a token for `user` bound to `session`.
    ///
    /// The token never outlives its session.
    pub fn generate_token(&self, user: &UserProfile, session: &Session) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = (now + self.expiration()).min(session.expires_at());

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: session.id().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Validates a JWT token and returns the claims.
    ///
    /// Signature, expiry, issuer and audience are checked. Whether the
    /// session is still open is up to the caller.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_nbf = true;

        let token_data: TokenData<Claims> = decode(token, &self.decoding_key, &validation)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid authentication token: {e}")))?;

        Ok(token_data.claims)
    }
}

/// Extracts the bearer token from an Authorization header value.
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scpi_security::UserId;
    use scpi_telemetry::masking::Sensitive;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: Sensitive::new("test-secret-key-for-testing".to_string()),
            expiration_secs: 3600,
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
        }
    }

    fn test_user() -> UserProfile {
        UserProfile {
            id: UserId::new(7),
            email: "user@example.com".to_string(),
            roles: vec![Role::User],
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = JwtManager::new(&test_config());
        let session = Session::new(UserId::new(7), Duration::hours(1));

        let token = manager.generate_token(&test_user(), &session).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.roles, vec![Role::User]);
        assert_eq!(claims.jti, session.id());
        assert_eq!(claims.iss, "test-issuer");
    }

    #[test]
    fn test_token_capped_by_session() {
        let manager = JwtManager::new(&test_config());
        let session = Session::new(UserId::new(7), Duration::minutes(5));

        let token = manager.generate_token(&test_user(), &session).unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.exp, session.expires_at().timestamp());
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(&test_config());
        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new(&test_config());
        let session = Session::new(UserId::new(7), Duration::hours(1));
        let token = manager.generate_token(&test_user(), &session).unwrap();

        let other = JwtManager::new(&JwtConfig {
            secret: Sensitive::new("another-secret-key-entirely".to_string()),
            ..test_config()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let manager = JwtManager::new(&test_config());
        let session = Session::new(UserId::new(7), Duration::hours(1));
        let token = manager.generate_token(&test_user(), &session).unwrap();

        let other = JwtManager::new(&JwtConfig {
            audience: "someone-else".to_string(),
            ..test_config()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
