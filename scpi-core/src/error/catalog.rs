//! Product catalog error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Errors raised by a [`ProductCatalog`](crate::traits::ProductCatalog)
/// implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogError {
    /// The backing store cannot be reached.
    #[error("[Catalog] Unavailable: {reason}")]
    Unavailable {
        /// Reason for the failure.
        reason: String,
    },

    /// A product with the same id already exists.
    #[error("[Catalog] Duplicate product id {product_id}")]
    DuplicateProduct {
        /// The conflicting id.
        product_id: ProductId,
    },

    /// A product definition is invalid.
    #[error("[Catalog] Invalid product {product_id}: {reason}")]
    InvalidProduct {
        /// Id of the product.
        product_id: ProductId,
        /// Reason it was rejected.
        reason: String,
    },
}

impl CatalogError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates an invalid product error.
    #[must_use]
    pub fn invalid_product(product_id: ProductId, reason: impl Into<String>) -> Self {
        Self::InvalidProduct {
            product_id,
            reason: reason.into(),
        }
    }
}
