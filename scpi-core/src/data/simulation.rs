//! Output of a portfolio simulation.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, ProductId, YieldRate};

/// Per-holding breakdown of a simulation, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Referenced product.
    #[serde(rename = "scpiId")]
    pub product_id: ProductId,
    /// Invested amount, as submitted.
    #[serde(rename = "montant")]
    pub amount: Amount,
    /// Yield of the product at simulation time.
    #[serde(rename = "rendement")]
    pub yield_rate: YieldRate,
    /// Yearly income of this holding, rounded to cents.
    #[serde(rename = "revenuAnnuel")]
    pub annual_income: Amount,
}

/// Aggregated projection for a whole portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Sum of all invested amounts.
    #[serde(rename = "montantTotal")]
    pub total_amount: Amount,
    /// Amount-weighted average yield, rounded to two decimals.
    #[serde(rename = "rendementMoyen")]
    pub average_yield: YieldRate,
    /// Projected yearly income, rounded to cents.
    #[serde(rename = "revenuAnnuel")]
    pub annual_income: Amount,
    /// Projected monthly income, rounded to cents.
    #[serde(rename = "revenuMensuel")]
    pub monthly_income: Amount,
    /// One entry per submitted holding.
    #[serde(rename = "details")]
    pub line_items: Vec<LineItem>,
}

impl SimulationResult {
    /// Number of holdings in the simulation.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.line_items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_result_wire_format() {
        let result = SimulationResult {
            total_amount: Amount::new(dec!(15000)).unwrap(),
            average_yield: YieldRate::new(dec!(4.70)).unwrap(),
            annual_income: Amount::new(dec!(705)).unwrap(),
            monthly_income: Amount::new(dec!(58.75)).unwrap(),
            line_items: vec![LineItem {
                product_id: ProductId::new(1),
                amount: Amount::new(dec!(10000)).unwrap(),
                yield_rate: YieldRate::new(dec!(4.5)).unwrap(),
                annual_income: Amount::new(dec!(450)).unwrap(),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["montantTotal"], 15000.0);
        assert_eq!(json["rendementMoyen"], 4.7);
        assert_eq!(json["revenuAnnuel"], 705.0);
        assert_eq!(json["revenuMensuel"], 58.75);
        assert_eq!(json["details"][0]["scpiId"], 1);
        assert_eq!(json["details"][0]["rendement"], 4.5);
        assert_eq!(json["details"][0]["revenuAnnuel"], 450.0);
        assert_eq!(result.holding_count(), 1);
    }
}
