//! Configuration loader supporting YAML, TOML and JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml)
    #[default]
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "yaml" | "yml" => Some(Self::Yaml),
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                _ => None,
            })
    }
}

/// Reads configuration files and strings into typed sections.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    source: Option<String>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, detecting the format from its extension.
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::InvalidFormat {
            path: path.display().to_string(),
            reason: "Unrecognized file extension. Supported: .yaml, .yml, .toml, .json".to_string(),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self {
            source: Some(path.display().to_string()),
        }
        .load_str(&content, format)
    }

    /// Loads configuration from a string in the given format.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let invalid = |kind: &str, e: &dyn std::fmt::Display| ConfigError::InvalidFormat {
            path: self.source.clone().unwrap_or_else(|| "<string>".to_string()),
            reason: format!("{kind} parse error: {e}"),
        };

        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| invalid("YAML", &e)),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| invalid("TOML", &e)),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| invalid("JSON", &e)),
        }
    }
}
