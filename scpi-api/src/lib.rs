//! # SCPI API
//!
//! REST API for the SCPI portfolio simulator.
//!
//! This crate provides:
//! - Account endpoints (register, login, logout, current user)
//! - The product listing and the portfolio simulation endpoint
//! - JWT bearer authentication backed by revocable sessions
//! - Request id propagation, CORS and request timeouts
//!
//! # Routes
//!
//! - `GET /api/health` - Health check (public)
//! - `POST /api/register` - Create an account (public)
//! - `POST /api/login` - Obtain a bearer token (public)
//! - `POST /api/logout` - Revoke the current token
//! - `GET /api/me` - Current user
//! - `GET /api/scpis` - SCPI products
//! - `POST /api/portfolio` - Simulate a portfolio
//!
//! # Authentication
//!
//! Protected endpoints expect an `Authorization: Bearer <token>` header
//! carrying a token returned by `/api/login`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use server::ApiServer;
pub use state::AppState;
