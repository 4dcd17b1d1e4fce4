//! Main server implementation.
//!
//! Seeds the catalog and accounts, runs the HTTP API and sweeps expired
//! sessions until shutdown.

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use scpi_api::{ApiServer, AppState};
use scpi_core::catalog::InMemoryCatalog;
use scpi_security::{PasswordHasher, SessionManager, UserDirectory};
use scpi_telemetry::logging::{LoggingError, init_logging};
use scpi_telemetry::masking::mask_email;

use crate::config::ServerConfig;
use crate::shutdown::{ShutdownController, setup_signal_handlers};

/// Lifecycle of a [`ScpiServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not initialized, or fully shut down
    Stopped,
    /// Initialized, not yet serving
    Starting,
    /// Serving requests
    Running,
    /// Draining connections
    ShuttingDown,
}

/// The SCPI simulator server.
pub struct ScpiServer {
    config: ServerConfig,
    state: Arc<RwLock<ServerState>>,
    shutdown: ShutdownController,
    app_state: Option<Arc<AppState>>,
    _log_guards: Vec<WorkerGuard>,
}

impl ScpiServer {
    /// Creates a stopped server.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            shutdown: ShutdownController::new(),
            app_state: None,
            _log_guards: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// Shutdown controller shared with the signal handlers.
    #[must_use]
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Application state, available once initialized.
    #[must_use]
    pub fn app_state(&self) -> Option<&Arc<AppState>> {
        self.app_state.as_ref()
    }

    /// Installs logging, then seeds the catalog and accounts.
    pub async fn initialize(&mut self) -> Result<(), ServerError> {
        {
            let mut state = self.state.write().await;
            if *state != ServerState::Stopped {
                return Err(ServerError::InvalidState(
                    "Server must be stopped to initialize".to_string(),
                ));
            }
            *state = ServerState::Starting;
        }

        self.init_logging()?;
        info!("Initializing SCPI server...");

        self.app_state = Some(Arc::new(build_state(&self.config)?));
        info!("Server initialized");

        Ok(())
    }

    fn init_logging(&mut self) -> Result<(), ServerError> {
        match init_logging(&self.config.logging) {
            Ok(guards) => {
                self._log_guards = guards;
                info!(level = %self.config.logging.level, "Logging initialized");
                Ok(())
            }
            Err(LoggingError::AlreadyInitialized(reason)) => {
                warn!(%reason, "Keeping the existing log subscriber");
                Ok(())
            }
            Err(e) => Err(ServerError::InitializationError(format!(
                "Failed to initialize logging: {e}"
            ))),
        }
    }

    /// Serves until shutdown is initiated, then drains for at most the
    /// configured shutdown timeout.
    pub async fn run(&self) -> Result<(), ServerError> {
        let app_state = {
            let mut state = self.state.write().await;
            let app_state = match (*state, &self.app_state) {
                (ServerState::Starting, Some(app_state)) => Arc::clone(app_state),
                _ => {
                    return Err(ServerError::InvalidState(
                        "Server must be initialized before running".to_string(),
                    ));
                }
            };
            *state = ServerState::Running;
            app_state
        };

        tokio::spawn(setup_signal_handlers(self.shutdown.clone()));
        let sweeper = self.spawn_session_sweeper(Arc::clone(&app_state.sessions));

        let shutdown = self.shutdown.clone();
        let api_server = ApiServer::new(app_state);
        let mut serving = tokio::spawn(api_server.run_with_shutdown(async move {
            shutdown.wait_for_shutdown().await;
        }));
        let abort = serving.abort_handle();

        let outcome = tokio::select! {
            joined = &mut serving => Some(joined),
            () = self.shutdown.wait_for_shutdown() => None,
        };

        let outcome = match outcome {
            Some(joined) => joined,
            None => {
                *self.state.write().await = ServerState::ShuttingDown;
                let grace = self.config.shutdown.timeout();
                info!(?grace, "Draining connections");
                match tokio::time::timeout(grace, serving).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!("Shutdown timeout elapsed, closing remaining connections");
                        abort.abort();
                        Ok(Ok(()))
                    }
                }
            }
        };

        sweeper.abort();
        *self.state.write().await = ServerState::Stopped;
        self.shutdown.mark_complete();

        outcome
            .map_err(|e| ServerError::RuntimeError(format!("API server task failed: {e}")))?
            .map_err(|e| ServerError::RuntimeError(format!("API server error: {e}")))?;

        info!("Graceful shutdown complete");
        Ok(())
    }

    fn spawn_session_sweeper(&self, sessions: Arc<SessionManager>) -> JoinHandle<()> {
        let period = self.config.shutdown.session_cleanup_interval();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = sessions.cleanup_expired();
                        if removed > 0 {
                            debug!(removed, "Expired sessions removed");
                        }
                    }
                    () = shutdown.wait_for_shutdown() => break,
                }
            }
        })
    }

    /// Initiates shutdown.
    pub fn shutdown(&self) {
        self.shutdown.initiate_shutdown();
    }
}

/// Builds the application state: catalog from configuration, password
/// hasher, and the seed accounts.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let catalog = InMemoryCatalog::from_config(&config.catalog)
        .map_err(|e| ServerError::InitializationError(e.to_string()))?;

    let hasher = PasswordHasher::new(&config.password)
        .map_err(|e| ServerError::InitializationError(e.to_string()))?;
    let users = UserDirectory::new(hasher);

    for seed in &config.users {
        users
            .register_with_roles(&seed.email, seed.password.expose(), seed.roles.iter().copied())
            .map_err(|e| {
                ServerError::InitializationError(format!(
                    "Failed to seed account {}: {e}",
                    mask_email(&seed.email)
                ))
            })?;
    }

    info!(
        products = catalog.len(),
        users = users.len(),
        "Catalog and accounts seeded"
    );

    Ok(AppState::new(
        config.api.clone(),
        Arc::new(catalog),
        Arc::new(users),
    ))
}

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A component failed to start
    #[error("Initialization error: {0}")]
    InitializationError(String),

    /// Operation not allowed in the current lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The server failed while running
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedUser;
    use scpi_security::{PasswordParams, Role};
    use scpi_telemetry::masking::Sensitive;
    use std::time::Duration;

    fn test_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.api.host = "127.0.0.1".to_string();
        config.api.port = 0;
        config.password = PasswordParams::minimal();
        config.shutdown.timeout_secs = 1;
        config
    }

    #[tokio::test]
    async fn test_server_new() {
        let server = ScpiServer::new(test_config());
        assert_eq!(server.state().await, ServerState::Stopped);
        assert!(server.app_state().is_none());
    }

    #[tokio::test]
    async fn test_run_requires_initialize() {
        let server = ScpiServer::new(test_config());
        let err = server.run().await.unwrap_err();
        assert!(matches!(err, ServerError::InvalidState(_)));
    }

    #[test]
    fn test_build_state_seeds_accounts() {
        let mut config = test_config();
        config.users.push(SeedUser {
            email: "admin@example.com".to_string(),
            password: Sensitive::new("admin-password".to_string()),
            roles: vec![Role::Admin],
        });

        let state = build_state(&config).unwrap();
        assert_eq!(state.users.len(), 2);
        assert_eq!(state.catalog.list().unwrap().len(), 3);

        let user = state.users.authenticate("user@example.com", "password").unwrap();
        assert_eq!(user.roles, vec![Role::User]);

        let admin = state
            .users
            .authenticate("admin@example.com", "admin-password")
            .unwrap();
        assert!(admin.roles.contains(&Role::Admin));
    }

    #[test]
    fn test_build_state_rejects_bad_seed() {
        let mut config = test_config();
        config.users[0].email = "not-an-email".to_string();

        let err = build_state(&config).unwrap_err();
        assert!(matches!(err, ServerError::InitializationError(_)));
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let mut server = ScpiServer::new(test_config());
        server.initialize().await.unwrap();
        assert_eq!(server.state().await, ServerState::Starting);
        assert!(server.initialize().await.is_err());

        let controller = server.shutdown_controller().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            controller.initiate_shutdown();
        });

        server.run().await.unwrap();
        assert_eq!(server.state().await, ServerState::Stopped);
        assert!(
            server
                .shutdown_controller()
                .wait_for_completion(Duration::from_millis(100))
                .await
        );
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::ConfigError("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }
}
