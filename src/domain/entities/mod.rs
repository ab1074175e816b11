//! # Domain Entities
//!
//! - [`MarketQuote`]: Market data snapshot with put schedule
//! - [`HedgeRequest`]: Inbound request, raw and validated
//! - [`FloorQuote`]: One instrument's floor (or the unavailable sentinel)
//! - [`HedgeRecommendation`]: Ordered floors plus the recommended instrument

pub mod floor_quote;
pub mod hedge_recommendation;
pub mod hedge_request;
pub mod market_quote;

pub use floor_quote::{FloorComponents, FloorQuote, FloorSet, FloorValue};
pub use hedge_recommendation::HedgeRecommendation;
pub use hedge_request::{HedgeRequest, ValidatedHedgeRequest};
pub use market_quote::{MarketQuote, PutOption};
