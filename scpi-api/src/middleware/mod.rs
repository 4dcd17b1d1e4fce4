//! API middleware components.
//!
//! This module provides middleware for:
//! - JWT authentication
//! - Request ID generation

pub mod auth;
mod request_id;

pub use auth::{Auth, AuthenticatedUser, auth_middleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdService};
