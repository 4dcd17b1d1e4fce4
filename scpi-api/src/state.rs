//! Application state for the API server.

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use scpi_core::catalog::InMemoryCatalog;
use scpi_core::traits::ProductCatalog;
use scpi_security::{PasswordHasher, PasswordParams, SecurityError, SessionManager, UserDirectory};

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    /// API configuration
    pub config: ApiConfig,
    /// JWT manager for authentication
    pub jwt_manager: Arc<JwtManager>,
    /// SCPI products
    pub catalog: Arc<dyn ProductCatalog>,
    /// Registered accounts
    pub users: Arc<UserDirectory>,
    /// Open sessions backing issued tokens
    pub sessions: Arc<SessionManager>,
    started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("jwt_manager", &self.jwt_manager)
            .field("users", &self.users.len())
            .field("sessions", &self.sessions.active_session_count())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates the state from its collaborators.
    ///
    /// Sessions last as long as the configured token lifetime.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        catalog: Arc<dyn ProductCatalog>,
        users: Arc<UserDirectory>,
    ) -> Self {
        let jwt_manager = Arc::new(JwtManager::new(&config.jwt));
        let sessions = Arc::new(SessionManager::new(jwt_manager.expiration()));

        Self {
            config,
            jwt_manager,
            catalog,
            users,
            sessions,
            started_at: Instant::now(),
        }
    }

    /// State with the demo catalog and an empty user directory.
    pub fn with_defaults(
        config: ApiConfig,
        password: &PasswordParams,
    ) -> Result<Self, SecurityError> {
        let users = UserDirectory::new(PasswordHasher::new(password)?);
        Ok(Self::new(
            config,
            Arc::new(InMemoryCatalog::with_demo_products()),
            Arc::new(users),
        ))
    }

    /// Returns a reference to the JWT manager.
    #[must_use]
    pub fn jwt_manager(&self) -> &Arc<JwtManager> {
        &self.jwt_manager
    }

    /// Seconds since the state was built.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Session lifetime.
    #[must_use]
    pub fn session_timeout(&self) -> Duration {
        self.sessions.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_new() {
        let state = AppState::with_defaults(ApiConfig::default(), &PasswordParams::minimal()).unwrap();

        assert!(state.users.is_empty());
        assert_eq!(state.sessions.active_session_count(), 0);
        assert_eq!(state.catalog.list().unwrap().len(), 3);
        assert_eq!(state.session_timeout(), Duration::hours(1));
    }
}
