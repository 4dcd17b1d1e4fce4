//! Portfolio simulation.
//!
//! Turns a list of holdings into projected yearly and monthly income using
//! the yields published by a [`ProductCatalog`](crate::traits::ProductCatalog).

mod engine;

pub use engine::{simulate, simulate_request};
