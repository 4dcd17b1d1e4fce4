//! Product catalog trait.

use std::collections::HashMap;

use crate::data::Product;
use crate::error::CatalogError;
use crate::types::ProductId;

/// Read access to the SCPI products known to the system.
///
/// Implementations must be safe to share across request handlers.
pub trait ProductCatalog: Send + Sync {
    /// Looks up a single product.
    ///
    /// Returns `Ok(None)` when the id is unknown.
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;

    /// Looks up several products in one call.
    ///
    /// Unknown ids are simply absent from the returned map. The default
    /// implementation calls [`find_by_id`](Self::find_by_id) once per id;
    /// stores with a batch query should override it.
    fn find_many(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>, CatalogError> {
        let mut found = HashMap::with_capacity(ids.len());
        for &id in ids {
            if found.contains_key(&id) {
                continue;
            }
            if let Some(product) = self.find_by_id(id)? {
                found.insert(id, product);
            }
        }
        Ok(found)
    }

    /// Returns every product, ordered by id.
    fn list(&self) -> Result<Vec<Product>, CatalogError>;
}
