//! Seed products for the in-memory catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Validatable, ValidationContext, Validator};
use crate::catalog::demo_products;
use crate::data::Product;
use crate::error::ConfigError;
use crate::types::YieldRate;

/// Products loaded into the catalog at startup.
///
/// Defaults to the three demo products when the section is absent.
///
/// ```yaml
/// catalog:
///   products:
///     - id: 1
///       name: SCPI Alpha
///       annual_yield: 4.5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Seed products.
    #[serde(default = "demo_products")]
    pub products: Vec<Product>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products: demo_products(),
        }
    }
}

impl Validatable for CatalogConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();
        let mut seen = HashSet::new();

        for (index, product) in self.products.iter().enumerate() {
            ctx.section(&format!("products[{index}]"), |ctx| {
                let mut validator = Validator::new(ctx);
                validator
                    .require_non_empty("name", &product.name)
                    .custom(
                        "annual_yield",
                        YieldRate::new(product.annual_yield.as_percent()).is_ok(),
                        "Yield must not be negative",
                    )
                    .custom(
                        "id",
                        seen.insert(product.id),
                        &format!("Duplicate product id {}", product.id),
                    );
            });
        }

        ctx.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFormat, ConfigLoader};
    use crate::types::ProductId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_demo_catalog() {
        let config = CatalogConfig::default();
        assert_eq!(config.products.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r"
products:
  - id: 7
    name: SCPI Delta
    annual_yield: 6.25
";
        let config: CatalogConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(
            config.products,
            vec![Product::new(
                ProductId::new(7),
                "SCPI Delta",
                YieldRate::new(dec!(6.25)).unwrap()
            )]
        );
    }

    #[test]
    fn test_absent_products_fall_back_to_demo() {
        let config: CatalogConfig = ConfigLoader::new()
            .load_str("{}", ConfigFormat::Json)
            .unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_rejects_duplicates_and_negative_yield() {
        let config = CatalogConfig {
            products: vec![
                Product::new(ProductId::new(1), "A", YieldRate::new_unchecked(dec!(4))),
                Product::new(ProductId::new(1), "B", YieldRate::new_unchecked(dec!(-1))),
            ],
        };
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("products[1].id"));
        assert!(message.contains("products[1].annual_yield"));
    }

    #[test]
    fn test_rejects_blank_name() {
        let config = CatalogConfig {
            products: vec![Product::new(ProductId::new(1), "  ", YieldRate::ZERO)],
        };
        let error = config.validate().unwrap_err();
        assert!(matches!(error, ConfigError::MissingField { .. }));
    }
}
