//! Simulation engine.
//!
//! Validation walks the holdings in input order and stops at the first
//! failing one. Sums are accumulated unrounded; incomes and the average
//! yield are rounded to cents only when the result is built. The total
//! amount is the exact sum of the submitted amounts.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::data::{Holding, HoldingInput, LineItem, PortfolioRequest, Product, SimulationResult};
use crate::error::SimulationError;
use crate::traits::ProductCatalog;
use crate::types::{Amount, ProductId, YieldRate, round_output};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Simulates the yearly and monthly income of a portfolio.
///
/// The catalog is queried once for all distinct product ids.
///
/// # Errors
///
/// - [`SimulationError::InvalidInput`] if `holdings` is empty, a holding lacks
///   its product id or amount, an amount is negative, or the sums overflow.
/// - [`SimulationError::ProductNotFound`] if a holding references an unknown product.
/// - [`SimulationError::Catalog`] if the catalog cannot be queried.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use scpi_core::catalog::InMemoryCatalog;
/// use scpi_core::data::HoldingInput;
/// use scpi_core::simulation::simulate;
/// use scpi_core::types::ProductId;
///
/// let catalog = InMemoryCatalog::with_demo_products();
/// let holdings = [
///     HoldingInput::new(ProductId::new(1), Decimal::from(10_000)),
///     HoldingInput::new(ProductId::new(2), Decimal::from(5_000)),
/// ];
///
/// let result = simulate(&holdings, &catalog).unwrap();
/// assert_eq!(result.annual_income.as_decimal(), Decimal::from(705));
/// assert_eq!(result.monthly_income.as_decimal(), Decimal::new(5875, 2));
/// ```
pub fn simulate(
    holdings: &[HoldingInput],
    catalog: &dyn ProductCatalog,
) -> Result<SimulationResult, SimulationError> {
    if holdings.is_empty() {
        return Err(SimulationError::invalid_input(
            "portefeuille",
            "must contain at least one holding",
        ));
    }

    let products = catalog.find_many(&distinct_product_ids(holdings))?;
    debug!(
        holdings = holdings.len(),
        products = products.len(),
        "Resolved portfolio products"
    );

    let mut totals = Totals::default();
    let mut line_items = Vec::with_capacity(holdings.len());

    for (index, input) in holdings.iter().enumerate() {
        let holding = validate_holding(index, input)?;
        let product = products
            .get(&holding.product_id)
            .ok_or_else(|| SimulationError::product_not_found(holding.product_id))?;

        let line_income = totals
            .add(holding, product)
            .ok_or_else(|| overflow(index))?;

        line_items.push(LineItem {
            product_id: holding.product_id,
            amount: holding.amount,
            yield_rate: product.annual_yield,
            annual_income: Amount::new_unchecked(round_output(line_income)),
        });
    }

    let result = totals.finish(line_items);
    debug!(
        total = %result.total_amount,
        annual_income = %result.annual_income,
        average_yield = %result.average_yield,
        "Portfolio simulated"
    );
    Ok(result)
}

/// Simulates the holdings of a decoded request body.
///
/// An absent `portefeuille` is treated like an empty one.
pub fn simulate_request(
    request: &PortfolioRequest,
    catalog: &dyn ProductCatalog,
) -> Result<SimulationResult, SimulationError> {
    simulate(request.holdings(), catalog)
}

fn distinct_product_ids(holdings: &[HoldingInput]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .filter_map(|holding| holding.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn validate_holding(index: usize, input: &HoldingInput) -> Result<Holding, SimulationError> {
    let product_id = input
        .product_id
        .ok_or_else(|| SimulationError::invalid_holding(index, "scpiId", "is required"))?;
    let amount = input
        .amount
        .ok_or_else(|| SimulationError::invalid_holding(index, "montant", "is required"))?;
    let amount = Amount::new(amount)
        .map_err(|_| SimulationError::invalid_holding(index, "montant", "must not be negative"))?;

    Ok(Holding { product_id, amount })
}

fn overflow(index: usize) -> SimulationError {
    SimulationError::invalid_holding(index, "montant", "amount is too large to simulate")
}

/// Unrounded running sums.
#[derive(Debug, Default)]
struct Totals {
    amount: Amount,
    weighted_yield: Decimal,
    annual_income: Decimal,
}

impl Totals {
    /// Adds a holding and returns its unrounded yearly income, or `None` on overflow.
    fn add(&mut self, holding: Holding, product: &Product) -> Option<Decimal> {
        let amount = holding.amount.as_decimal();
        let line_income = product.annual_yield.annual_income(holding.amount)?;

        self.amount = self.amount.checked_add(holding.amount)?;
        self.weighted_yield = self
            .weighted_yield
            .checked_add(amount.checked_mul(product.annual_yield.as_percent())?)?;
        self.annual_income = self.annual_income.checked_add(line_income)?;

        Some(line_income)
    }

    fn finish(self, line_items: Vec<LineItem>) -> SimulationResult {
        let average_yield = if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            self.weighted_yield / self.amount.as_decimal()
        };

        SimulationResult {
            total_amount: self.amount,
            average_yield: YieldRate::new_unchecked(round_output(average_yield)),
            annual_income: Amount::new_unchecked(round_output(self.annual_income)),
            monthly_income: Amount::new_unchecked(round_output(
                self.annual_income / MONTHS_PER_YEAR,
            )),
            line_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::error::CatalogError;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn holding(id: i64, amount: Decimal) -> HoldingInput {
        HoldingInput::new(ProductId::new(id), amount)
    }

    fn catalog_with(yields: &[(i64, Decimal)]) -> InMemoryCatalog {
        InMemoryCatalog::from_products(yields.iter().map(|&(id, rate)| {
            Product::new(
                ProductId::new(id),
                format!("SCPI {id}"),
                YieldRate::new(rate).unwrap(),
            )
        }))
        .unwrap()
    }

    #[test]
    fn test_two_holdings_scenario() {
        let catalog = catalog_with(&[(1, dec!(4.5)), (2, dec!(5.1))]);
        let result = simulate(
            &[holding(1, dec!(10000)), holding(2, dec!(5000))],
            &catalog,
        )
        .unwrap();

        assert_eq!(result.total_amount.as_decimal(), dec!(15000));
        assert_eq!(result.annual_income.as_decimal(), dec!(705));
        assert_eq!(result.average_yield.as_percent(), dec!(4.70));
        assert_eq!(result.monthly_income.as_decimal(), dec!(58.75));

        assert_eq!(result.line_items.len(), 2);
        assert_eq!(result.line_items[0].product_id, ProductId::new(1));
        assert_eq!(result.line_items[0].annual_income.as_decimal(), dec!(450));
        assert_eq!(result.line_items[1].yield_rate.as_percent(), dec!(5.1));
        assert_eq!(result.line_items[1].annual_income.as_decimal(), dec!(255));
    }

    #[test]
    fn test_zero_amount_scenario() {
        let catalog = catalog_with(&[(1, dec!(5))]);
        let result = simulate(&[holding(1, dec!(0))], &catalog).unwrap();

        assert!(result.total_amount.is_zero());
        assert_eq!(result.average_yield, YieldRate::ZERO);
        assert!(result.annual_income.is_zero());
        assert!(result.monthly_income.is_zero());
        assert_eq!(result.line_items.len(), 1);
    }

    #[test]
    fn test_empty_holdings_rejected() {
        let catalog = InMemoryCatalog::with_demo_products();
        let error = simulate(&[], &catalog).unwrap_err();
        assert!(matches!(
            error,
            SimulationError::InvalidInput { ref field, .. } if field == "portefeuille"
        ));

        let request = PortfolioRequest::default();
        assert!(simulate_request(&request, &catalog).is_err());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let catalog = InMemoryCatalog::with_demo_products();
        let error = simulate(&[holding(1, dec!(-1))], &catalog).unwrap_err();
        assert_eq!(
            error,
            SimulationError::invalid_holding(0, "montant", "must not be negative")
        );
    }

    #[test]
    fn test_unknown_product_rejected() {
        let catalog = InMemoryCatalog::with_demo_products();
        let error = simulate(&[holding(1, dec!(100)), holding(42, dec!(100))], &catalog)
            .unwrap_err();
        assert_eq!(error, SimulationError::product_not_found(ProductId::new(42)));
        assert!(error.to_string().contains("42"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let catalog = InMemoryCatalog::with_demo_products();

        let missing_id = HoldingInput {
            product_id: None,
            amount: Some(dec!(10)),
        };
        let error = simulate(&[missing_id], &catalog).unwrap_err();
        assert!(error.to_string().contains("portefeuille[0].scpiId"));

        let missing_amount = HoldingInput {
            product_id: Some(ProductId::new(1)),
            amount: None,
        };
        let error = simulate(&[holding(1, dec!(1)), missing_amount], &catalog).unwrap_err();
        assert!(error.to_string().contains("portefeuille[1].montant"));
    }

    #[test]
    fn test_first_failing_holding_wins() {
        let catalog = InMemoryCatalog::with_demo_products();

        let error = simulate(&[holding(99, dec!(10)), holding(1, dec!(-5))], &catalog)
            .unwrap_err();
        assert_eq!(error, SimulationError::product_not_found(ProductId::new(99)));

        let error = simulate(&[holding(1, dec!(-5)), holding(99, dec!(10))], &catalog)
            .unwrap_err();
        assert!(matches!(error, SimulationError::InvalidInput { .. }));
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let catalog = catalog_with(&[(1, dec!(4.5)), (2, dec!(0))]);

        let error = simulate(&[holding(1, Decimal::MAX)], &catalog).unwrap_err();
        assert!(error.to_string().contains("too large"));

        let error = simulate(&[holding(2, Decimal::MAX), holding(2, Decimal::MAX)], &catalog)
            .unwrap_err();
        assert_eq!(error, overflow(1));
    }

    #[test]
    fn test_total_is_order_independent() {
        let catalog = InMemoryCatalog::with_demo_products();
        let holdings = vec![
            holding(1, dec!(1234.56)),
            holding(2, dec!(789.01)),
            holding(3, dec!(50000)),
            holding(1, dec!(0.99)),
        ];
        let mut reversed = holdings.clone();
        reversed.reverse();

        let forward = simulate(&holdings, &catalog).unwrap();
        let backward = simulate(&reversed, &catalog).unwrap();

        assert_eq!(forward.total_amount.as_decimal(), dec!(52024.56));
        assert_eq!(forward.total_amount, backward.total_amount);
        assert_eq!(forward.annual_income, backward.annual_income);
        assert_eq!(forward.average_yield, backward.average_yield);
        assert_eq!(
            forward.total_amount.as_decimal(),
            forward.line_items.iter().map(|l| l.amount.as_decimal()).sum::<Decimal>()
        );
    }

    #[test]
    fn test_total_is_exact_sum_of_line_amounts() {
        let catalog = InMemoryCatalog::with_demo_products();
        let result = simulate(&[holding(1, dec!(100.004)), holding(2, dec!(0.001))], &catalog)
            .unwrap();

        let line_sum: Decimal = result.line_items.iter().map(|l| l.amount.as_decimal()).sum();
        assert_eq!(line_sum, dec!(100.005));
        assert_eq!(result.total_amount.as_decimal(), line_sum);
    }

    #[test]
    fn test_monthly_times_twelve_matches_annual() {
        let catalog = InMemoryCatalog::with_demo_products();
        let result = simulate(
            &[holding(1, dec!(3333.33)), holding(3, dec!(7777.77))],
            &catalog,
        )
        .unwrap();

        let drift = (result.monthly_income.as_decimal() * dec!(12)
            - result.annual_income.as_decimal())
        .abs();
        assert!(drift <= dec!(0.07), "drift was {drift}");
    }

    #[test]
    fn test_uniform_yield_average() {
        let catalog = catalog_with(&[(1, dec!(4.2)), (2, dec!(4.2))]);
        let result = simulate(
            &[holding(1, dec!(123.45)), holding(2, dec!(9876.54)), holding(1, dec!(1))],
            &catalog,
        )
        .unwrap();
        assert_eq!(result.average_yield.as_percent(), dec!(4.2));
    }

    #[test]
    fn test_accumulates_unrounded_income() {
        // each line rounds to 0.00 but the unrounded sum is 0.01
        let catalog = catalog_with(&[(1, dec!(1))]);
        let result = simulate(
            &[holding(1, dec!(0.333)), holding(1, dec!(0.333)), holding(1, dec!(0.334))],
            &catalog,
        )
        .unwrap();

        assert!(result.line_items.iter().all(|l| l.annual_income.is_zero()));
        assert_eq!(result.annual_income.as_decimal(), dec!(0.01));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let catalog = catalog_with(&[(1, dec!(5))]);
        // 0.5 * 5 / 100 = 0.025 -> 0.03
        let result = simulate(&[holding(1, dec!(0.5))], &catalog).unwrap();
        assert_eq!(result.annual_income.as_decimal(), dec!(0.03));
    }

    struct CountingCatalog {
        inner: InMemoryCatalog,
        batches: parking_lot::Mutex<Vec<Vec<ProductId>>>,
    }

    impl ProductCatalog for CountingCatalog {
        fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
            self.inner.find_by_id(id)
        }

        fn find_many(
            &self,
            ids: &[ProductId],
        ) -> Result<HashMap<ProductId, Product>, CatalogError> {
            self.batches.lock().push(ids.to_vec());
            self.inner.find_many(ids)
        }

        fn list(&self) -> Result<Vec<Product>, CatalogError> {
            self.inner.list()
        }
    }

    #[test]
    fn test_catalog_queried_once_with_distinct_ids() {
        let catalog = CountingCatalog {
            inner: InMemoryCatalog::with_demo_products(),
            batches: parking_lot::Mutex::new(Vec::new()),
        };

        simulate(
            &[holding(2, dec!(1)), holding(1, dec!(1)), holding(2, dec!(1))],
            &catalog,
        )
        .unwrap();

        let batches = catalog.batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![ProductId::new(2), ProductId::new(1)]);
    }

    struct BrokenCatalog;

    impl ProductCatalog for BrokenCatalog {
        fn find_by_id(&self, _id: ProductId) -> Result<Option<Product>, CatalogError> {
            Err(CatalogError::unavailable("connection refused"))
        }

        fn list(&self) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::unavailable("connection refused"))
        }
    }

    #[test]
    fn test_catalog_failure_is_propagated() {
        let error = simulate(&[holding(1, dec!(1))], &BrokenCatalog).unwrap_err();
        assert!(matches!(error, SimulationError::Catalog(_)));
        assert!(!error.is_client_error());
    }
}
