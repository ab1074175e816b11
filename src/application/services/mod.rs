//! # Application Services
//!
//! Services that orchestrate the domain models and market data.
//!
//! - [`FloorPriceCalculator`]: Validation, one quote fetch, three models
//! - [`RecommendationEngine`]: Epsilon tie-break selection and ranking
//! - [`PriceQuoteService`]: Boundary façade with audit forwarding

pub mod floor_calculator;
pub mod price_quote;
pub mod recommendation;

pub use floor_calculator::{
    COMMODITY_FIELD, CalculatorConfig, CancelHandle, FetchContext, FloorCalculation,
    FloorPriceCalculator, TERM_FIELD, VOLUME_FIELD,
};
pub use price_quote::{HedgeBreakdown, InstrumentBreakdown, MarketContext, PriceQuoteService};
pub use recommendation::{
    DEFAULT_EPSILON, EpsilonTieBreakStrategy, FloorRankingStrategy, RankedFloor,
    RecommendationEngine,
};
