//! Server configuration module.
//!
//! Groups every section the server needs at startup: the API, logging,
//! the seed catalog, seed accounts, password hashing cost and shutdown.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use scpi_api::ApiConfig;
use scpi_core::config::{
    CatalogConfig, ConfigLoader, Configurable, EnvOverride, Validatable, ValidationContext,
    Validator,
};
use scpi_core::error::ConfigError;
use scpi_security::{PasswordParams, Role};
use scpi_telemetry::logging::{LogConfig, LogFormat};
use scpi_telemetry::masking::Sensitive;

/// Prefix of the environment variables read by the server.
pub const ENV_PREFIX: &str = "SCPI";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging
    #[serde(default)]
    pub logging: LogConfig,

    /// Products loaded into the catalog
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Accounts created at startup
    #[serde(default = "default_seed_users")]
    pub users: Vec<SeedUser>,

    /// Argon2 cost
    #[serde(default)]
    pub password: PasswordParams,

    /// Shutdown and housekeeping
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LogConfig::default(),
            catalog: CatalogConfig::default(),
            users: default_seed_users(),
            password: PasswordParams::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads `path`, falling back to defaults when the file does not exist,
    /// then applies environment overrides.
    ///
    /// The result is not validated; command-line overrides come first.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = if path.exists() {
            ConfigLoader::new().load_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(ENV_PREFIX)?;
        Ok(config)
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();

        ctx.section("api", |ctx| self.api.validate_into(ctx));

        if let Err(e) = self.logging.validate() {
            ctx.add_error(ConfigError::invalid_value("logging", e.to_string()));
        }

        ctx.section("catalog", |ctx| ctx.check(self.catalog.validate()));

        let mut emails = HashSet::new();
        for (index, user) in self.users.iter().enumerate() {
            ctx.section(&format!("users[{index}]"), |ctx| {
                Validator::new(ctx)
                    .require_non_empty("email", &user.email)
                    .require_non_empty("password", user.password.expose())
                    .custom(
                        "email",
                        emails.insert(user.email.trim().to_lowercase()),
                        "Duplicate seed account",
                    );
            });
        }

        ctx.section("password", |ctx| {
            Validator::new(ctx)
                .positive("memory_cost", &self.password.memory_cost)
                .positive("time_cost", &self.password.time_cost)
                .positive("parallelism", &self.password.parallelism);
        });

        ctx.section("shutdown", |ctx| {
            Validator::new(ctx)
                .in_range("timeout_secs", &self.shutdown.timeout_secs, &1, &300)
                .positive(
                    "session_cleanup_secs",
                    &self.shutdown.session_cleanup_secs,
                );
        });

        ctx.into_result()
    }
}

impl Configurable for ServerConfig {
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_string(&format!("{prefix}_SERVER_HOST"), &mut self.api.host);
        EnvOverride::apply_parsed(&format!("{prefix}_SERVER_PORT"), &mut self.api.port)?;

        let mut secret = self.api.jwt.secret.expose().clone();
        EnvOverride::apply_string(&format!("{prefix}_JWT_SECRET"), &mut secret);
        self.api.jwt.secret = Sensitive::new(secret);
        EnvOverride::apply_parsed(
            &format!("{prefix}_JWT_EXPIRATION_SECS"),
            &mut self.api.jwt.expiration_secs,
        )?;

        EnvOverride::apply_string(&format!("{prefix}_LOG_LEVEL"), &mut self.logging.level);
        EnvOverride::apply_parsed::<LogFormat>(
            &format!("{prefix}_LOG_FORMAT"),
            &mut self.logging.format,
        )?;

        EnvOverride::apply_parsed(
            &format!("{prefix}_SHUTDOWN_TIMEOUT"),
            &mut self.shutdown.timeout_secs,
        )?;
        Ok(())
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        [
            "SERVER_HOST",
            "SERVER_PORT",
            "JWT_SECRET",
            "JWT_EXPIRATION_SECS",
            "LOG_LEVEL",
            "LOG_FORMAT",
            "SHUTDOWN_TIMEOUT",
        ]
        .iter()
        .map(|name| format!("{prefix}_{name}"))
        .collect()
    }
}

/// An account created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    /// E-mail address
    pub email: String,
    /// Plain-text password, hashed when seeding
    pub password: Sensitive<String>,
    /// Extra roles; `ROLE_USER` is always granted
    #[serde(default)]
    pub roles: Vec<Role>,
}

fn default_seed_users() -> Vec<SeedUser> {
    vec![SeedUser {
        email: "user@example.com".to_string(),
        password: Sensitive::new("password".to_string()),
        roles: Vec::new(),
    }]
}

/// Shutdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Time given to in-flight requests after a shutdown signal, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub timeout_secs: u64,

    /// Interval between sweeps of expired sessions, in seconds.
    #[serde(default = "default_session_cleanup_secs")]
    pub session_cleanup_secs: u64,
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

fn default_session_cleanup_secs() -> u64 {
    300
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_shutdown_timeout_secs(),
            session_cleanup_secs: default_session_cleanup_secs(),
        }
    }
}

impl ShutdownConfig {
    /// Returns the shutdown timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the session sweep interval as a Duration.
    #[must_use]
    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session_cleanup_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].email, "user@example.com");
        assert_eq!(config.catalog.products.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shutdown_config_timeout() {
        let config = ShutdownConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.session_cleanup_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  port: 9090\n  jwt:\n    secret: a-long-enough-test-secret\n\
             logging:\n  level: debug\n  format: pretty\n\
             catalog:\n  products:\n    - id: 7\n      name: SCPI Delta\n      annual_yield: 6.1\n\
             users: []\n"
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.api.jwt.secret.expose(), "a-long-enough-test-secret");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.catalog.products.len(), 1);
        assert!(config.users.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn test_validation_reports_sections() {
        let mut config = ServerConfig::default();
        config.users.push(SeedUser {
            email: "USER@example.com".to_string(),
            password: Sensitive::new("x".to_string()),
            roles: vec![Role::Admin],
        });
        config.shutdown.timeout_secs = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("users[1].email"));
        assert!(message.contains("shutdown.timeout_secs"));
    }

    #[test]
    fn test_env_var_names() {
        let names = ServerConfig::env_var_names(ENV_PREFIX);
        assert!(names.contains(&"SCPI_SERVER_PORT".to_string()));
        assert!(names.contains(&"SCPI_JWT_SECRET".to_string()));
        assert!(names.contains(&"SCPI_LOG_FORMAT".to_string()));
    }

    #[test]
    fn test_env_overrides() {
        let prefix = "SCPI_SERVER_CONFIG_TEST";
        // SAFETY: the variables use a prefix no other test reads.
        unsafe {
            std::env::set_var(format!("{prefix}_SERVER_PORT"), "9191");
            std::env::set_var(format!("{prefix}_JWT_SECRET"), "secret-from-the-environment");
            std::env::set_var(format!("{prefix}_LOG_FORMAT"), "pretty");
        }

        let mut config = ServerConfig::default();
        config.apply_env_overrides(prefix).unwrap();
        assert_eq!(config.api.port, 9191);
        assert_eq!(config.api.jwt.secret.expose(), "secret-from-the-environment");
        assert_eq!(config.logging.format, LogFormat::Pretty);

        // SAFETY: as above.
        unsafe {
            std::env::set_var(format!("{prefix}_SERVER_PORT"), "not-a-port");
        }
        let err = config.apply_env_overrides(prefix).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_secret_not_serialized() {
        let json = serde_json::to_string(&ServerConfig::default()).unwrap();
        assert!(!json.contains("change-me-in-production"));
        assert!(json.contains("[REDACTED]"));
    }
}
