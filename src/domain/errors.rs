//! # Domain Errors
//!
//! Errors raised by domain entities and instrument models.
//!
//! Instrument model errors are *model-local*: the floor calculator absorbs
//! them into an unavailable floor for that instrument instead of failing the
//! whole request.

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::{Commodity, HedgeInstrument};
use rust_decimal::Decimal;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No put strike exists within the supported band around the target strike.
    #[error("no put strike within {band} of {target_strike} for {commodity}")]
    UnsupportedStrike {
        /// Commodity the quote was for.
        commodity: Commodity,
        /// Futures price rounded to the strike increment.
        target_strike: Decimal,
        /// Maximum accepted distance from the target strike.
        band: Decimal,
    },

    /// The market quote carries no put options at all.
    #[error("put schedule is empty for {0}")]
    EmptyPutSchedule(Commodity),

    /// A market quote failed validation.
    #[error("invalid market quote: {0}")]
    InvalidMarketQuote(String),

    /// Model configuration failed validation.
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    /// Checked arithmetic failed inside a model.
    #[error("arithmetic error in {instrument} model: {source}")]
    Arithmetic {
        /// Instrument whose model failed.
        instrument: HedgeInstrument,
        /// Underlying arithmetic failure.
        source: ArithmeticError,
    },
}

impl DomainError {
    /// Creates an invalid market quote error.
    #[must_use]
    pub fn invalid_quote(message: impl Into<String>) -> Self {
        Self::InvalidMarketQuote(message.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Wraps an arithmetic failure raised by the given instrument's model.
    #[must_use]
    pub fn arithmetic(instrument: HedgeInstrument, source: ArithmeticError) -> Self {
        Self::Arithmetic { instrument, source }
    }

    /// Returns true if this error is local to one instrument model.
    ///
    /// Model-local errors degrade a single floor to unavailable rather than
    /// failing the request.
    #[must_use]
    pub fn is_model_local(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedStrike { .. } | Self::EmptyPutSchedule(_) | Self::Arithmetic { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_strike_display() {
        let err = DomainError::UnsupportedStrike {
            commodity: Commodity::wheat(),
            target_strike: Decimal::new(15000, 0),
            band: Decimal::new(500, 0),
        };
        let msg = err.to_string();
        assert!(msg.contains("15000"));
        assert!(msg.contains("500"));
        assert!(msg.contains("wheat"));
        assert!(err.is_model_local());
    }

    #[test]
    fn arithmetic_names_instrument() {
        let err = DomainError::arithmetic(HedgeInstrument::Forward, ArithmeticError::Overflow);
        assert!(err.to_string().contains("forward"));
        assert!(err.is_model_local());
    }

    #[test]
    fn quote_and_config_errors_are_not_model_local() {
        assert!(!DomainError::invalid_quote("negative premium").is_model_local());
        assert!(!DomainError::invalid_config("empty schedule").is_model_local());
    }
}
