//! Error types and handling framework.
//!
//! - [`SimulationError`] - Rejected simulation input
//! - [`CatalogError`] - Product catalog failures
//! - [`ConfigError`] - Configuration loading and validation errors
//!
//! Simulation errors are always caller input problems and are never
//! retried. Catalog errors are infrastructure failures.

mod catalog;
mod config;
mod simulation;

pub use catalog::CatalogError;
pub use config::ConfigError;
pub use simulation::SimulationError;
