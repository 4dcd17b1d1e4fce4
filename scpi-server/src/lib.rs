//! # SCPI Server
//!
//! Server entry point for the SCPI portfolio simulator.
//!
//! This crate provides:
//! - Configuration loading with environment overrides
//! - Logging initialization
//! - Catalog and account seeding
//! - API server startup
//! - Graceful shutdown handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use server::{ScpiServer, ServerError};
pub use shutdown::ShutdownController;
