//! Security error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Security-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityError {
    /// A required credential field was empty.
    #[error("Missing field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// The e-mail address is malformed.
    #[error("Invalid email address: {email}")]
    InvalidEmail {
        /// The rejected address.
        email: String,
    },

    /// The e-mail address is already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// Unknown e-mail or wrong password. Both cases share one message.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// User not found.
    #[error("User not found: {user_id}")]
    UserNotFound {
        /// Id that was looked up.
        user_id: String,
    },

    /// Password hashing or verification failed for a reason other than a mismatch.
    #[error("Password hashing error: {reason}")]
    PasswordHash {
        /// Reason for the failure.
        reason: String,
    },

    /// Session expired.
    #[error("Session expired")]
    SessionExpired,

    /// Invalid token.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Reason for the invalid token.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    ConfigurationError {
        /// Reason for the configuration error.
        reason: String,
    },
}

impl SecurityError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a password hashing error.
    #[must_use]
    pub fn password_hash(reason: impl Into<String>) -> Self {
        Self::PasswordHash {
            reason: reason.into(),
        }
    }

    /// Creates an invalid token error.
    #[must_use]
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Returns true if the caller presented bad or stale credentials.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::SessionExpired | Self::InvalidToken { .. }
        )
    }
}

/// Result type for security operations.
pub type Result<T> = std::result::Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SecurityError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            SecurityError::missing_field("password").to_string(),
            "Missing field: password"
        );
    }

    #[test]
    fn test_authentication_errors() {
        assert!(SecurityError::InvalidCredentials.is_authentication_error());
        assert!(SecurityError::invalid_token("revoked").is_authentication_error());
        assert!(!SecurityError::EmailTaken.is_authentication_error());
    }
}
