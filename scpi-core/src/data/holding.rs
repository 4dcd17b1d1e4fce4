//! Portfolio holdings submitted for simulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Amount, ProductId};

/// A holding exactly as the caller sent it.
///
/// Both fields are optional so that a missing `scpiId` or `montant` is
/// reported by the simulation engine as a validation error naming the field,
/// instead of failing JSON decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingInput {
    /// Referenced product.
    #[serde(rename = "scpiId", default)]
    pub product_id: Option<ProductId>,
    /// Invested amount in euros.
    #[serde(
        rename = "montant",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
}

impl HoldingInput {
    /// Creates a fully populated holding input.
    #[must_use]
    pub fn new(product_id: ProductId, amount: Decimal) -> Self {
        Self {
            product_id: Some(product_id),
            amount: Some(amount),
        }
    }
}

/// A validated holding: a known product id and a non-negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holding {
    /// Referenced product.
    pub product_id: ProductId,
    /// Invested amount.
    pub amount: Amount,
}

impl From<Holding> for HoldingInput {
    fn from(holding: Holding) -> Self {
        Self::new(holding.product_id, holding.amount.as_decimal())
    }
}

/// Body of a simulation request: `{"portefeuille": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// Holdings to simulate. Absent and empty are treated alike.
    #[serde(rename = "portefeuille", default)]
    pub holdings: Option<Vec<HoldingInput>>,
}

impl PortfolioRequest {
    /// Returns the submitted holdings, or an empty slice when absent.
    #[must_use]
    pub fn holdings(&self) -> &[HoldingInput] {
        self.holdings.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_decoding() {
        let json = r#"{"portefeuille": [{"scpiId": 1, "montant": 10000}, {"scpiId": 2, "montant": 5000.5}]}"#;
        let request: PortfolioRequest = serde_json::from_str(json).unwrap();
        let holdings = request.holdings();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0], HoldingInput::new(ProductId::new(1), dec!(10000)));
        assert_eq!(holdings[1].amount, Some(dec!(5000.5)));
    }

    #[test]
    fn test_missing_fields_decode_as_none() {
        let json = r#"{"portefeuille": [{"scpiId": 1}, {"montant": 10}, {"scpiId": null, "montant": null}]}"#;
        let request: PortfolioRequest = serde_json::from_str(json).unwrap();
        let holdings = request.holdings();
        assert_eq!(holdings[0].amount, None);
        assert_eq!(holdings[1].product_id, None);
        assert_eq!(holdings[2], HoldingInput::default());
    }

    #[test]
    fn test_absent_portfolio_is_empty() {
        let request: PortfolioRequest = serde_json::from_str("{}").unwrap();
        assert!(request.holdings().is_empty());
    }
}
