//! # Volume Value Object
//!
//! Strictly positive commodity volume in tonnes.

use crate::domain::value_objects::arithmetic::{ArithmeticError, ArithmeticResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive volume in tonnes.
///
/// Upper bounds are a configuration concern and are enforced by the floor
/// calculator when validating a request.
///
/// # Examples
///
/// ```
/// use hedgefarm_pricer::domain::value_objects::VolumeTonnes;
///
/// let volume = VolumeTonnes::from_f64(1000.0).unwrap();
/// assert_eq!(volume.to_f64(), 1000.0);
/// assert!(VolumeTonnes::from_f64(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeTonnes(Decimal);

impl VolumeTonnes {
    /// Creates a volume from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is not positive.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value <= Decimal::ZERO {
            return Err(ArithmeticError::InvalidValue("volume must be positive"));
        }
        Ok(Self(value))
    }

    /// Creates a volume from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if the value is not finite,
    /// not representable as a decimal, or not positive.
    pub fn from_f64(value: f64) -> ArithmeticResult<Self> {
        if !value.is_finite() {
            return Err(ArithmeticError::InvalidValue("volume must be finite"));
        }
        let decimal = Decimal::from_f64(value)
            .ok_or(ArithmeticError::InvalidValue("volume out of range"))?;
        Self::new(decimal)
    }

    /// Returns the underlying decimal value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the volume as `f64` for transport encodings.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for VolumeTonnes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}t", self.0)
    }
}
