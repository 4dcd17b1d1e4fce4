//! API request handlers.
//!
//! This module provides handlers for all API endpoints.

pub mod auth;
pub mod health;
pub mod portfolio;
pub mod products;
