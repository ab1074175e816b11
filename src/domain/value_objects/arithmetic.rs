//! # Checked Arithmetic
//!
//! Overflow-safe decimal arithmetic for the floor models, plus strike
//! rounding.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let futures = Decimal::new(15000, 0);
//! let margin = Decimal::new(200, 0);
//! assert_eq!(futures.safe_sub(margin).unwrap(), Decimal::new(14800, 0));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Failure of a checked decimal operation inside a floor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Result exceeds the decimal range.
    #[error("arithmetic overflow")]
    Overflow,

    /// Result falls below the decimal range.
    #[error("arithmetic underflow")]
    Underflow,

    /// Divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Input outside the domain of the operation.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result of a checked decimal operation.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Decimal operations that report range errors instead of panicking.
///
/// Floor models chain these with `?` and wrap the failure in
/// `DomainError::Arithmetic` together with the instrument.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// `Overflow` if the sum is out of range.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// `Underflow` if the difference is out of range.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// `Overflow` if the product is out of range.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Checked division.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` for a zero divisor, `Overflow` if the quotient is out
    /// of range.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Rounds `value` to the nearest multiple of `increment`.
///
/// Midpoints round away from zero, so `14950` with an increment of `100`
/// becomes `15000`.
///
/// # Errors
///
/// Returns `ArithmeticError::InvalidValue` if the increment is not positive,
/// or an overflow error if the rescaled value cannot be represented.
///
/// # Examples
///
/// ```
/// use hedgefarm_pricer::domain::value_objects::arithmetic::round_to_increment;
/// use rust_decimal::Decimal;
///
/// let rounded = round_to_increment(Decimal::new(14960, 0), Decimal::new(100, 0)).unwrap();
/// assert_eq!(rounded, Decimal::new(15000, 0));
/// ```
pub fn round_to_increment(value: Decimal, increment: Decimal) -> ArithmeticResult<Decimal> {
    if increment <= Decimal::ZERO {
        return Err(ArithmeticError::InvalidValue("increment must be positive"));
    }

    let steps = value
        .safe_div(increment)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.safe_mul(increment)
}
