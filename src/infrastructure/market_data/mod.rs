//! # Market Data
//!
//! The [`MarketQuoteSource`] port and its adapters.
//!
//! - [`StaticQuoteSource`]: In-memory quotes, including the demo wheat chain
//! - [`CachedQuoteSource`]: Freshness-window cache around any source
//! - [`HttpQuoteSource`]: JSON market data service over HTTP

pub mod cached_source;
pub mod error;
pub mod http_source;
pub mod static_source;
pub mod traits;

pub use cached_source::CachedQuoteSource;
pub use error::{MarketDataError, MarketDataResult};
pub use http_source::{HttpQuoteSource, QuotePayload};
pub use static_source::{StaticQuoteSource, demo_wheat_quote};
pub use traits::MarketQuoteSource;
