//! Configuration loading and validation.
//!
//! Configuration files may be YAML, TOML or JSON. Every section implements
//! [`Validatable`], and sections that accept environment overrides implement
//! [`Configurable`].
//!
//! # Example
//!
//! ```rust,ignore
//! use scpi_core::config::{CatalogConfig, ConfigLoader};
//!
//! let catalog: CatalogConfig = ConfigLoader::new().load_file("catalog.yaml")?;
//! ```

mod catalog_config;
mod loader;
mod traits;
pub mod validation;

pub use catalog_config::CatalogConfig;
pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
pub use validation::{EnvOverride, ValidationContext, ValidationResult, Validator};
