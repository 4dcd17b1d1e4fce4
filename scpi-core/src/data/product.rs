//! SCPI product as exposed by the catalog.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, YieldRate};

/// An SCPI product with its annual distribution yield.
///
/// Serialized as `{"id": 1, "nom": "SCPI Alpha", "tauxRendementAnnuel": 4.5}`.
/// Configuration files may also use `name` and `annual_yield`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nom", alias = "name")]
    pub name: String,
    /// Annual yield in percent.
    #[serde(rename = "tauxRendementAnnuel", alias = "annual_yield")]
    pub annual_yield: YieldRate,
}

impl Product {
    /// Creates a new product.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, annual_yield: YieldRate) -> Self {
        Self {
            id,
            name: name.into(),
            annual_yield,
        }
    }
}
