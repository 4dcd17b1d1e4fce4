//! CLI command implementations.

pub mod products;
pub mod simulate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use scpi_core::catalog::InMemoryCatalog;
use scpi_core::config::{CatalogConfig, ConfigLoader, Validatable};

/// Output format shared by the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON, as served by the API
    Json,
}

/// Only the `catalog` section of a server configuration file is read.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    catalog: CatalogConfig,
}

/// Builds the catalog from the `catalog` section of `path`, or the demo
/// products when no file is given.
pub fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
    let config = match path {
        Some(path) => {
            let file: CatalogFile = ConfigLoader::new()
                .load_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
            file.catalog
        }
        None => CatalogConfig::default(),
    };

    config.validate().context("Invalid catalog")?;
    let catalog = InMemoryCatalog::from_config(&config).context("Failed to build catalog")?;
    debug!(products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}
