//! Product catalog implementations.

mod memory;

pub use memory::{InMemoryCatalog, demo_products};
