//! In-memory product catalog.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::data::Product;
use crate::error::CatalogError;
use crate::traits::ProductCatalog;
use crate::types::{ProductId, YieldRate};

/// Products seeded when no catalog is configured.
///
/// | id | name       | yield |
/// |----|------------|-------|
/// | 1  | SCPI Alpha | 4.5 % |
/// | 2  | SCPI Beta  | 5.1 % |
/// | 3  | SCPI Gamma | 4.2 % |
#[must_use]
pub fn demo_products() -> Vec<Product> {
    [(1, "SCPI Alpha", 45), (2, "SCPI Beta", 51), (3, "SCPI Gamma", 42)]
        .into_iter()
        .map(|(id, name, tenths)| {
            Product::new(
                ProductId::new(id),
                name,
                YieldRate::new_unchecked(Decimal::new(tenths, 1)),
            )
        })
        .collect()
}

/// Catalog held in memory, ordered by product id.
///
/// # Example
///
/// ```
/// use scpi_core::catalog::InMemoryCatalog;
/// use scpi_core::traits::ProductCatalog;
/// use scpi_core::types::ProductId;
///
/// let catalog = InMemoryCatalog::with_demo_products();
/// let beta = catalog.find_by_id(ProductId::new(2)).unwrap().unwrap();
/// assert_eq!(beta.name, "SCPI Beta");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the [`demo_products`].
    #[must_use]
    pub fn with_demo_products() -> Self {
        let products = demo_products()
            .into_iter()
            .map(|product| (product.id, product))
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Creates a catalog from a list of products.
    ///
    /// Fails on duplicate ids or negative yields.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Creates a catalog from its configuration section.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let catalog = Self::from_products(config.products.iter().cloned())?;
        debug!(products = catalog.len(), "Catalog loaded from configuration");
        Ok(catalog)
    }

    /// Adds a product.
    pub fn insert(&self, product: Product) -> Result<(), CatalogError> {
        if YieldRate::new(product.annual_yield.as_percent()).is_err() {
            return Err(CatalogError::invalid_product(
                product.id,
                "yield must not be negative",
            ));
        }

        let mut products = self.products.write();
        if products.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct {
                product_id: product.id,
            });
        }
        products.insert(product.id, product);
        Ok(())
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Returns true if the catalog holds no product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.read().get(&id).cloned())
    }

    fn find_many(&self, ids: &[ProductId]) -> Result<HashMap<ProductId, Product>, CatalogError> {
        let products = self.products.read();
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).map(|product| (*id, product.clone())))
            .collect())
    }

    fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_demo_catalog() {
        let catalog = InMemoryCatalog::with_demo_products();
        let products = catalog.list().unwrap();

        assert_eq!(products.len(), 3);
        assert_eq!(products[0].name, "SCPI Alpha");
        assert_eq!(products[0].annual_yield.as_percent(), dec!(4.5));
        assert_eq!(products[1].annual_yield.as_percent(), dec!(5.1));
        assert_eq!(products[2].annual_yield.as_percent(), dec!(4.2));
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let catalog = InMemoryCatalog::from_products([
            Product::new(ProductId::new(9), "Z", YieldRate::ZERO),
            Product::new(ProductId::new(3), "C", YieldRate::ZERO),
        ])
        .unwrap();

        let ids: Vec<i64> = catalog.list().unwrap().iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![3, 9]);
    }

    #[test]
    fn test_find_by_id_unknown() {
        let catalog = InMemoryCatalog::with_demo_products();
        assert_eq!(catalog.find_by_id(ProductId::new(42)).unwrap(), None);
    }

    #[test]
    fn test_find_many() {
        let catalog = InMemoryCatalog::with_demo_products();
        let found = catalog
            .find_many(&[ProductId::new(3), ProductId::new(99), ProductId::new(1)])
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[&ProductId::new(3)].name, "SCPI Gamma");
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let catalog = InMemoryCatalog::with_demo_products();
        let result = catalog.insert(Product::new(ProductId::new(1), "Again", YieldRate::ZERO));
        assert_eq!(
            result,
            Err(CatalogError::DuplicateProduct {
                product_id: ProductId::new(1)
            })
        );
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_insert_rejects_negative_yield() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.insert(Product::new(
            ProductId::new(5),
            "Bad",
            YieldRate::new_unchecked(dec!(-0.5)),
        ));
        assert!(matches!(result, Err(CatalogError::InvalidProduct { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_config() {
        let catalog = InMemoryCatalog::from_config(&CatalogConfig::default()).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
