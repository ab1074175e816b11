//! # Market Data Errors
//!
//! Error types for market quote sources.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::infrastructure::market_data::error::MarketDataError;
//!
//! let error = MarketDataError::timeout("quote request timed out");
//! assert!(error.is_retryable());
//!
//! let error = MarketDataError::not_found("barley");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for market quote source operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketDataError {
    /// The source has no data for the commodity.
    #[error("no market data for {commodity}")]
    NotFound {
        /// Commodity requested.
        commodity: String,
    },

    /// The freshest available quote is older than allowed.
    #[error("market quote for {commodity} is stale: {age_secs}s old, max {max_age_secs}s")]
    Stale {
        /// Commodity requested.
        commodity: String,
        /// Age of the quote in seconds.
        age_secs: u64,
        /// Maximum accepted age in seconds.
        max_age_secs: u64,
    },

    /// Request timed out.
    #[error("market data timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("market data connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Response could not be understood.
    #[error("market data protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Internal source error.
    #[error("market data internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl MarketDataError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(commodity: impl Into<String>) -> Self {
        Self::NotFound {
            commodity: commodity.into(),
        }
    }

    /// Creates a stale quote error.
    #[must_use]
    pub fn stale(commodity: impl Into<String>, age_secs: u64, max_age_secs: u64) -> Self {
        Self::Stale {
            commodity: commodity.into(),
            age_secs,
            max_age_secs,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if a caller may retry the fetch with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Stale { .. } | Self::Timeout { .. } | Self::Connection { .. }
        )
    }

    /// Returns true if the source simply has no data for the commodity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for market data operations.
pub type MarketDataResult<T> = Result<T, MarketDataError>;
