//! # Price Value Object
//!
//! Non-negative price in currency per tonne.

use crate::domain::value_objects::arithmetic::{ArithmeticError, ArithmeticResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per tonne, used for per-kilogram reporting.
const KG_PER_TONNE: Decimal = Decimal::ONE_THOUSAND;

/// A non-negative price expressed in currency per tonne.
///
/// # Examples
///
/// ```
/// use hedgefarm_pricer::domain::value_objects::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::from_f64(14500.0).unwrap();
/// assert_eq!(price.get(), Decimal::new(14500, 0));
/// assert_eq!(price.per_kg(), Decimal::new(145, 1));
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a price from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is negative.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ArithmeticError::InvalidValue("price must not be negative"));
        }
        Ok(Self(value))
    }

    /// Creates a price from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is not finite,
    /// cannot be represented as a decimal, or is negative.
    pub fn from_f64(value: f64) -> ArithmeticResult<Self> {
        if !value.is_finite() {
            return Err(ArithmeticError::InvalidValue("price must be finite"));
        }
        let decimal = Decimal::from_f64(value)
            .ok_or(ArithmeticError::InvalidValue("price out of range"))?;
        Self::new(decimal)
    }

    /// Returns the underlying decimal value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the price is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the price in currency per kilogram.
    #[must_use]
    pub fn per_kg(&self) -> Decimal {
        self.0 / KG_PER_TONNE
    }

    /// Returns the price as `f64` for transport encodings.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert!(Price::new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn negative_is_rejected() {
        assert!(Price::new(Decimal::new(-1, 2)).is_err());
        assert!(Price::from_f64(-0.5).is_err());
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(Price::from_f64(f64::NAN).is_err());
        assert!(Price::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn per_kg_divides_by_thousand() {
        let p = Price::new(Decimal::new(16500, 0)).unwrap();
        assert_eq!(p.per_kg(), Decimal::new(165, 1));
    }

    #[test]
    fn ordering_follows_value() {
        let low = Price::new(Decimal::new(14500, 0)).unwrap();
        let high = Price::new(Decimal::new(14800, 0)).unwrap();
        assert!(low < high);
    }
}
