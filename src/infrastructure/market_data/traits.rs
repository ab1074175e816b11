//! # Market Quote Source
//!
//! Port definition for market data providers.
//!
//! A source answers one question: the current [`MarketQuote`] for a
//! commodity, no older than `max_age_secs`. It is a pure read and never
//! mutates anything the caller can observe.
//!
//! # Examples
//!
//! ```ignore
//! use hedgefarm_pricer::infrastructure::market_data::traits::MarketQuoteSource;
//!
//! struct ExchangeFeed { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl MarketQuoteSource for ExchangeFeed {
//!     // ... implement get_quote
//! }
//! ```

use crate::domain::entities::MarketQuote;
use crate::domain::value_objects::Commodity;
use crate::infrastructure::market_data::error::MarketDataResult;
use async_trait::async_trait;
use std::fmt;

/// Supplier of market quotes.
#[async_trait]
pub trait MarketQuoteSource: Send + Sync + fmt::Debug {
    /// Returns the source name used in logs.
    fn name(&self) -> &str;

    /// Fetches the current quote for `commodity`.
    ///
    /// Returns `Ok(None)` when the source has no data for the commodity.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::Stale` if the freshest quote is older than
    /// `max_age_secs`, or a transport error if the source cannot be reached.
    async fn get_quote(
        &self,
        commodity: &Commodity,
        max_age_secs: u64,
    ) -> MarketDataResult<Option<MarketQuote>>;
}
