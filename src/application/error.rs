//! # Application Errors
//!
//! The failure taxonomy of the pricing façade.
//!
//! Every externally visible failure is one of these kinds, each with a stable
//! string code the REST boundary hands to consumers.
//!
//! # Error Hierarchy
//!
//! ```text
//! HedgeError
//! ├── InvalidRequest       - bad input, not retryable
//! ├── QuoteUnavailable     - market data missing or stale, retryable
//! ├── NoViableInstrument   - every instrument model failed
//! ├── Cancelled            - caller aborted, no partial result
//! └── Internal             - invariant breach
//! ```
//!
//! Model-local failures (for example an unsupported put strike) never
//! appear here: the floor calculator turns them into unavailable floors.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::application::error::HedgeError;
//!
//! let err = HedgeError::invalid_request("volumeTonnes", "must be positive");
//! assert_eq!(err.code(), "invalid_request");
//! assert!(!err.is_retryable());
//! ```

use crate::infrastructure::market_data::MarketDataError;
use thiserror::Error;

/// Pricing façade error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HedgeError {
    /// A request field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidRequest {
        /// Offending field, named as in the consumer contract.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Market data could not be obtained.
    #[error("market quote unavailable for {commodity}: {reason}")]
    QuoteUnavailable {
        /// Commodity requested.
        commodity: String,
        /// Why the quote is missing.
        reason: String,
    },

    /// No instrument produced a floor.
    #[error("no viable hedging instrument: {}", reasons.join("; "))]
    NoViableInstrument {
        /// One reason per failed instrument, in canonical order.
        reasons: Vec<String>,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// An internal invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HedgeError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a quote unavailable error.
    #[must_use]
    pub fn quote_unavailable(commodity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QuoteUnavailable {
            commodity: commodity.into(),
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the stable machine-readable code for consumers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::QuoteUnavailable { .. } => "quote_unavailable",
            Self::NoViableInstrument { .. } => "no_viable_instrument",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns true if the caller may retry with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuoteUnavailable { .. })
    }

    /// Converts a market data failure for `commodity`.
    #[must_use]
    pub fn from_market_data(commodity: impl Into<String>, error: &MarketDataError) -> Self {
        Self::quote_unavailable(commodity, error.to_string())
    }
}

/// Result type for pricing operations.
pub type HedgeResult<T> = Result<T, HedgeError>;
