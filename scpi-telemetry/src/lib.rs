//! # SCPI Telemetry
//!
//! Logging and tracing for the SCPI portfolio simulator.
//!
//! This crate provides:
//! - Structured logging with JSON and pretty formats
//! - Stdout and rotating file outputs
//! - Masking of passwords, bearer tokens and JWTs in log output
//! - Named spans for requests, simulations, authentication and catalog reads

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Sensitive data masking
pub mod masking;

/// Span definitions
pub mod spans;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LogOutput, init_logging};
    pub use crate::masking::{SensitiveDataMasker, Sensitive, mask_email};
    pub use crate::spans::*;
}
