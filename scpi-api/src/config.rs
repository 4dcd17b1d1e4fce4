//! API configuration types.
//!
//! This module provides configuration for the API server including:
//! - Server binding address and port
//! - JWT authentication settings
//! - CORS settings

use axum::http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use scpi_core::config::{Validatable, ValidationContext, Validator};
use scpi_core::error::ConfigError;
use scpi_telemetry::masking::Sensitive;

/// Shortest accepted JWT signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt: JwtConfig::default(),
            cors: CorsConfig::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Returns the server bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Records every problem with this section into `ctx`.
    pub fn validate_into(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .require_non_empty("host", &self.host)
            .positive("port", &self.port)
            .in_range("request_timeout_secs", &self.request_timeout_secs, &1, &600);

        ctx.section("jwt", |ctx| self.jwt.validate_into(ctx));
        ctx.section("cors", |ctx| self.cors.validate_into(ctx));
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();
        self.validate_into(&mut ctx);
        ctx.into_result()
    }
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens. Prefer `SCPI_JWT_SECRET` over the config file.
    #[serde(default = "default_jwt_secret")]
    pub secret: Sensitive<String>,

    /// Token expiration time in seconds
    #[serde(default = "default_token_expiration")]
    pub expiration_secs: u64,

    /// Issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            expiration_secs: default_token_expiration(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Returns the token expiration duration.
    #[must_use]
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }

    fn validate_into(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .min_length("secret", self.secret.expose(), MIN_JWT_SECRET_LEN)
            .in_range("expiration_secs", &self.expiration_secs, &60, &(30 * 24 * 3600))
            .require_non_empty("issuer", &self.issuer)
            .require_non_empty("audience", &self.audience);
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins (empty means all origins)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allowed methods
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![],
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: false,
            max_age_secs: default_max_age(),
        }
    }
}

impl CorsConfig {
    fn validate_into(&self, ctx: &mut ValidationContext) {
        let mut validator = Validator::new(ctx);
        for origin in &self.allowed_origins {
            validator.custom(
                "allowed_origins",
                HeaderValue::from_str(origin).is_ok(),
                &format!("'{origin}' is not a valid origin"),
            );
        }
        for method in &self.allowed_methods {
            validator.custom(
                "allowed_methods",
                Method::from_bytes(method.as_bytes()).is_ok(),
                &format!("'{method}' is not an HTTP method"),
            );
        }
        for header in &self.allowed_headers {
            validator.custom(
                "allowed_headers",
                HeaderName::from_bytes(header.as_bytes()).is_ok(),
                &format!("'{header}' is not a header name"),
            );
        }
        // Browsers reject credentials on a wildcard origin.
        validator.custom(
            "allow_credentials",
            !(self.enabled && self.allow_credentials && self.allowed_origins.is_empty()),
            "Credentials require explicit allowed_origins",
        );
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_jwt_secret() -> Sensitive<String> {
    Sensitive::new("change-me-in-production".to_string())
}

fn default_token_expiration() -> u64 {
    3600 // 1 hour
}

fn default_issuer() -> String {
    "scpi-folio".to_string()
}

fn default_audience() -> String {
    "scpi-folio-api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "OPTIONS".to_string(),
    ]
}

fn default_headers() -> Vec<String> {
    vec![
        "Content-Type".to_string(),
        "Authorization".to_string(),
        "X-Request-Id".to_string(),
    ]
}

fn default_max_age() -> u64 {
    3600
}
