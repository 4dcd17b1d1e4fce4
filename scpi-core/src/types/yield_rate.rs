//! Annual yield expressed in percent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Amount, ValidationError};

/// Annual distribution yield of an SCPI, in percent (`4.5` means 4.5 %).
///
/// # Examples
///
/// ```
/// use scpi_core::types::{Amount, YieldRate};
/// use rust_decimal::Decimal;
///
/// let rate = YieldRate::new(Decimal::new(45, 1)).unwrap();
/// let invested = Amount::new(Decimal::from(10_000)).unwrap();
/// assert_eq!(rate.annual_income(invested), Some(Decimal::from(450)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct YieldRate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl YieldRate {
    /// Zero yield constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new `YieldRate`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativeYield` if the value is negative.
    pub fn new(percent: Decimal) -> Result<Self, ValidationError> {
        if percent.is_sign_negative() && !percent.is_zero() {
            return Err(ValidationError::NegativeYield(percent));
        }
        Ok(Self(percent))
    }

    /// Creates a new `YieldRate` without validation.
    #[must_use]
    pub const fn new_unchecked(percent: Decimal) -> Self {
        Self(percent)
    }

    /// Returns the yield in percent.
    #[must_use]
    pub const fn as_percent(&self) -> Decimal {
        self.0
    }

    /// Unrounded yearly income produced by `amount` at this rate.
    ///
    /// Returns `None` if the computation overflows.
    #[must_use]
    pub fn annual_income(&self, amount: Amount) -> Option<Decimal> {
        amount
            .as_decimal()
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for YieldRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for YieldRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim_end_matches('%'))
            .map_err(|_| ValidationError::InvalidDecimal(s.to_string()))?;
        Self::new(decimal)
    }
}

impl Default for YieldRate {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yield_rate_new() {
        let rate = YieldRate::new(dec!(5.1)).unwrap();
        assert_eq!(rate.as_percent(), dec!(5.1));
        assert_eq!(rate.to_string(), "5.1%");
    }

    #[test]
    fn test_yield_rate_rejects_negative() {
        assert!(matches!(
            YieldRate::new(dec!(-0.5)),
            Err(ValidationError::NegativeYield(_))
        ));
    }

    #[test]
    fn test_yield_rate_zero_constant() {
        assert!(YieldRate::ZERO.as_percent().is_zero());
        assert_eq!(YieldRate::default(), YieldRate::ZERO);
    }

    #[test]
    fn test_yield_rate_from_str() {
        assert_eq!("4.2".parse::<YieldRate>().unwrap().as_percent(), dec!(4.2));
        assert_eq!("4.2%".parse::<YieldRate>().unwrap().as_percent(), dec!(4.2));
        assert!("n/a".parse::<YieldRate>().is_err());
    }

    #[test]
    fn test_annual_income() {
        let rate = YieldRate::new(dec!(5.1)).unwrap();
        let amount = Amount::new(dec!(5000)).unwrap();
        assert_eq!(rate.annual_income(amount), Some(dec!(255)));
    }

    #[test]
    fn test_annual_income_overflow() {
        let rate = YieldRate::new(dec!(1000)).unwrap();
        let amount = Amount::new_unchecked(Decimal::MAX);
        assert!(rate.annual_income(amount).is_none());
    }
}
