//! Core trait definitions.
//!
//! - catalog - Read access to SCPI products
//!
//! ```ignore
//! use scpi_core::traits::ProductCatalog;
//!
//! struct DatabaseCatalog { /* ... */ }
//! impl ProductCatalog for DatabaseCatalog { /* ... */ }
//! ```

mod catalog;

pub use catalog::ProductCatalog;
