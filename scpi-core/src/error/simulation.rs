//! Simulation error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CatalogError;
use crate::types::ProductId;

/// Reasons a portfolio simulation is rejected.
///
/// # Examples
///
/// ```
/// use scpi_core::error::SimulationError;
///
/// let error = SimulationError::invalid_holding(2, "montant", "must not be negative");
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'portefeuille[2].montant': must not be negative"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationError {
    /// The request is malformed: empty portfolio, missing field or negative amount.
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput {
        /// Path of the offending field.
        field: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A holding references a product the catalog does not know.
    #[error("SCPI id {product_id} not found")]
    ProductNotFound {
        /// The unknown product id.
        product_id: ProductId,
    },

    /// The catalog could not be queried.
    #[error("{0}")]
    Catalog(#[from] CatalogError),
}

impl SimulationError {
    /// Creates an invalid input error for a top-level field.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error for a field of the holding at `index`.
    #[must_use]
    pub fn invalid_holding(index: usize, field: &str, reason: impl Into<String>) -> Self {
        Self::invalid_input(format!("portefeuille[{index}].{field}"), reason)
    }

    /// Creates a product not found error.
    #[must_use]
    pub const fn product_not_found(product_id: ProductId) -> Self {
        Self::ProductNotFound { product_id }
    }

    /// Returns true if the caller can fix the error by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Catalog(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let error = SimulationError::invalid_input("portefeuille", "must contain at least one holding");
        assert!(error.to_string().contains("portefeuille"));
        assert!(error.is_client_error());
    }

    #[test]
    fn test_product_not_found_message() {
        let error = SimulationError::product_not_found(ProductId::new(42));
        assert_eq!(error.to_string(), "SCPI id 42 not found");
    }

    #[test]
    fn test_catalog_error_is_not_client_error() {
        let error = SimulationError::from(CatalogError::unavailable("down"));
        assert!(!error.is_client_error());
    }
}
