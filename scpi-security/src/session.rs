//! Session tracking for issued tokens.
//!
//! Every login opens a session whose id is embedded in the bearer token.
//! A token is only honoured while its session is present, so logging out
//! revokes the token before it expires.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SecurityError};
use crate::user::UserId;

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Opens a session for `user_id` lasting `timeout`.
    #[must_use]
    pub fn new(user_id: UserId, timeout: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + timeout,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owner of the session.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the expiration timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Checks if the session is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Live sessions keyed by session id.
pub struct SessionManager {
    sessions: DashMap<String, Arc<Session>>,
    timeout: Duration,
}

impl SessionManager {
    /// Creates a session manager whose sessions last `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    /// Returns the session lifetime.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Opens a session for `user_id`.
    pub fn create_session(&self, user_id: UserId) -> Arc<Session> {
        let session = Arc::new(Session::new(user_id, self.timeout));
        self.sessions
            .insert(session.id().to_string(), Arc::clone(&session));
        session
    }

    /// Returns the session if it exists and has not expired.
    ///
    /// Expired sessions are removed on the way.
    pub fn validate_session(&self, session_id: &str) -> Result<Arc<Session>> {
        let entry = self
            .sessions
            .get(session_id)
            .ok_or_else(|| SecurityError::invalid_token("Session not found"))?;

        let session = Arc::clone(entry.value());

        if session.is_expired() {
            drop(entry);
            self.sessions.remove(session_id);
            return Err(SecurityError::SessionExpired);
        }

        Ok(session)
    }

    /// Closes a session. Returns false if it was not open.
    pub fn invalidate_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Closes every session of a user.
    pub fn invalidate_user_sessions(&self, user_id: UserId) {
        self.sessions
            .retain(|_, session| session.user_id() != user_id);
    }

    /// Drops expired sessions and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired());
        before.saturating_sub(self.sessions.len())
    }

    /// Returns the number of open sessions.
    #[must_use]
    pub fn active_session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.sessions.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
