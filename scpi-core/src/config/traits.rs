//! Configuration traits for validation and environment overrides.

use crate::error::ConfigError;

/// Trait for configuration sections that can check their own values.
///
/// # Example
///
/// ```rust
/// use scpi_core::config::Validatable;
/// use scpi_core::error::ConfigError;
///
/// struct ListenConfig {
///     port: u16,
/// }
///
/// impl Validatable for ListenConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.port == 0 {
///             return Err(ConfigError::invalid_value("port", "Port cannot be 0"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(ListenConfig { port: 0 }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for configuration sections that read overrides from the environment.
pub trait Configurable: Sized {
    /// Applies environment variable overrides using `prefix` (e.g. `SCPI`).
    ///
    /// A variable that is set but does not parse is an error.
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError>;

    /// Lists the environment variables this section reads.
    fn env_var_names(prefix: &str) -> Vec<String>;
}
