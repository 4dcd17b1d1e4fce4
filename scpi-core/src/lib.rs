//! # SCPI Core
//!
//! Core types, traits, and the portfolio simulation engine for the SCPI
//! portfolio simulator.
//!
//! This crate provides:
//! - `NewType` wrappers for monetary amounts, yields and product ids
//! - The product and simulation data model, with its JSON wire names
//! - Error types for simulation, catalog and configuration failures
//! - The [`ProductCatalog`](traits::ProductCatalog) trait and an in-memory catalog
//! - The portfolio simulation engine
//! - Configuration management with YAML/TOML/JSON support and environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Core type definitions and 'NewType' wrappers
pub mod types;

/// Products, holdings and simulation results
pub mod data;

/// Error types and handling
pub mod error;

/// Core trait definitions
pub mod traits;

/// Product catalog implementations
pub mod catalog;

/// Portfolio simulation engine
pub mod simulation;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::data::*;
    pub use crate::error::*;
    pub use crate::simulation::*;
    pub use crate::traits::*;
    pub use crate::types::*;
}
