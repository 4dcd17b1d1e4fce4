//! NewType wrappers for portfolio primitives.
//!
//! This module provides type-safe wrappers around decimal values
//! so that invested amounts, yields and product ids cannot be mixed up.
//!
//! # Types
//!
//! - [`Amount`] - Non-negative monetary amounts (euros)
//! - [`YieldRate`] - Annual yield expressed in percent
//! - [`ProductId`] - Catalog product identifiers

mod amount;
mod product_id;
mod yield_rate;

pub use amount::Amount;
pub use product_id::ProductId;
pub use yield_rate::YieldRate;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on every currency and percentage output.
pub const OUTPUT_DECIMAL_PLACES: u32 = 2;

/// Rounds a value to [`OUTPUT_DECIMAL_PLACES`] using half-away-from-zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use scpi_core::types::round_output;
///
/// assert_eq!(round_output(Decimal::new(1005, 3)), Decimal::new(101, 2));
/// assert_eq!(round_output(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
/// ```
#[must_use]
pub fn round_output(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(OUTPUT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Amount value is negative
    #[error("amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Yield value is negative
    #[error("yield cannot be negative: {0}")]
    NegativeYield(Decimal),

    /// Value could not be parsed as a decimal
    #[error("invalid decimal value: {0}")]
    InvalidDecimal(String),

    /// Product id could not be parsed
    #[error("invalid product id: {0}")]
    InvalidProductId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_output_half_away_from_zero() {
        assert_eq!(round_output(dec!(2.345)), dec!(2.35));
        assert_eq!(round_output(dec!(2.344)), dec!(2.34));
        assert_eq!(round_output(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_output(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn test_round_output_keeps_short_values() {
        assert_eq!(round_output(dec!(4.7)), dec!(4.7));
        assert_eq!(round_output(dec!(705)), dec!(705));
    }
}
