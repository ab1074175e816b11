//! # Price Quote Service
//!
//! The boundary façade: composes the floor calculator and the
//! recommendation engine, forwards completed recommendations to the audit
//! sink, and returns either a [`HedgeRecommendation`] or a [`HedgeError`]
//! with a stable code.
//!
//! # Examples
//!
//! ```no_run
//! use hedgefarm_pricer::application::services::{
//!     FloorPriceCalculator, PriceQuoteService, RecommendationEngine,
//! };
//! use hedgefarm_pricer::infrastructure::market_data::StaticQuoteSource;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(StaticQuoteSource::demo()?);
//! let calculator = FloorPriceCalculator::from_model_config(
//!     source,
//!     &Default::default(),
//!     Default::default(),
//! );
//! let service = PriceQuoteService::new(calculator, RecommendationEngine::default());
//!
//! let recommendation = service.get_hedge_price(1000.0, Some("wheat")).await?;
//! println!("recommended: {}", recommendation.recommended());
//! # Ok(())
//! # }
//! ```

use crate::application::error::HedgeResult;
use crate::application::services::floor_calculator::{
    FetchContext, FloorCalculation, FloorPriceCalculator,
};
use crate::application::services::recommendation::{RankedFloor, RecommendationEngine};
use crate::domain::entities::{FloorComponents, FloorQuote, HedgeRecommendation, HedgeRequest};
use crate::domain::value_objects::commodity::DEFAULT_COMMODITY;
use crate::domain::value_objects::{Commodity, HedgeInstrument, Price, Timestamp};
use crate::infrastructure::audit::{AuditRecord, AuditSink};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One instrument in the detailed breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentBreakdown {
    /// Instrument priced.
    pub instrument: HedgeInstrument,
    /// Floor per tonne, `None` if unavailable.
    pub floor: Option<Price>,
    /// Floor per kilogram, `None` if unavailable.
    pub floor_per_kg: Option<Decimal>,
    /// Cost components, `None` if unavailable.
    pub components: Option<FloorComponents>,
    /// Warning for degenerate or unavailable floors.
    pub warning: Option<String>,
    /// True if the instrument exposes the producer to margin calls.
    pub margin_calls: bool,
}

impl From<&FloorQuote> for InstrumentBreakdown {
    fn from(quote: &FloorQuote) -> Self {
        let floor = quote.floor_price();
        Self {
            instrument: quote.instrument(),
            floor,
            floor_per_kg: floor.map(|p| p.per_kg()),
            components: quote.components().cloned(),
            warning: quote.warning(),
            margin_calls: quote.instrument().requires_margin(),
        }
    }
}

/// Market data the floors were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketContext {
    /// Commodity quoted.
    pub commodity: Commodity,
    /// Futures price per tonne.
    pub futures_price: Price,
    /// Signed forward basis per tonne.
    pub forward_basis: Decimal,
    /// Number of put strikes in the chain.
    pub put_strikes: usize,
    /// When the quote was observed.
    pub quoted_at: Timestamp,
}

/// Recommendation plus per-instrument detail and ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HedgeBreakdown {
    /// The recommendation.
    pub recommendation: HedgeRecommendation,
    /// Per-instrument detail, canonical order.
    pub instruments: Vec<InstrumentBreakdown>,
    /// Market context.
    pub market: MarketContext,
    /// Available floors ranked best first.
    pub ranking: Vec<RankedFloor>,
    /// Ranking strategy used.
    pub strategy: &'static str,
}

/// Pricing façade.
#[derive(Clone)]
pub struct PriceQuoteService {
    calculator: FloorPriceCalculator,
    engine: RecommendationEngine,
    audit: Option<Arc<dyn AuditSink>>,
}

impl fmt::Debug for PriceQuoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceQuoteService")
            .field("calculator", &self.calculator)
            .field("engine", &self.engine)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}

impl PriceQuoteService {
    /// Creates a service without an audit sink.
    #[must_use]
    pub fn new(calculator: FloorPriceCalculator, engine: RecommendationEngine) -> Self {
        Self {
            calculator,
            engine,
            audit: None,
        }
    }

    /// Forwards every completed recommendation to `sink`.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Returns the floor calculator.
    #[inline]
    #[must_use]
    pub fn calculator(&self) -> &FloorPriceCalculator {
        &self.calculator
    }

    /// Returns the recommendation engine.
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Prices a hedge with the default fetch bounds.
    ///
    /// `commodity` defaults to wheat.
    ///
    /// # Errors
    ///
    /// Returns any [`HedgeError`](crate::application::error::HedgeError) kind.
    pub async fn get_hedge_price(
        &self,
        volume_tonnes: f64,
        commodity: Option<&str>,
    ) -> HedgeResult<HedgeRecommendation> {
        self.price(&request(volume_tonnes, commodity), &FetchContext::new())
            .await
    }

    /// Prices a hedge request within the given fetch bounds.
    ///
    /// # Errors
    ///
    /// Returns any [`HedgeError`](crate::application::error::HedgeError) kind.
    pub async fn price(
        &self,
        request: &HedgeRequest,
        ctx: &FetchContext,
    ) -> HedgeResult<HedgeRecommendation> {
        self.evaluate(request, ctx)
            .await
            .map(|(_, recommendation)| recommendation)
    }

    /// Prices a hedge and returns the detailed breakdown.
    ///
    /// # Errors
    ///
    /// Returns any [`HedgeError`](crate::application::error::HedgeError) kind.
    pub async fn get_hedge_breakdown(
        &self,
        volume_tonnes: f64,
        commodity: Option<&str>,
        ctx: &FetchContext,
    ) -> HedgeResult<HedgeBreakdown> {
        self.breakdown(&request(volume_tonnes, commodity), ctx)
            .await
    }

    /// Prices a hedge request and returns the detailed breakdown.
    ///
    /// # Errors
    ///
    /// Returns any [`HedgeError`](crate::application::error::HedgeError) kind.
    pub async fn breakdown(
        &self,
        request: &HedgeRequest,
        ctx: &FetchContext,
    ) -> HedgeResult<HedgeBreakdown> {
        let (calculation, recommendation) = self.evaluate(request, ctx).await?;

        let floors = calculation.floors.to_vec();
        let quote = &calculation.quote;
        Ok(HedgeBreakdown {
            instruments: floors.iter().map(InstrumentBreakdown::from).collect(),
            market: MarketContext {
                commodity: quote.commodity().clone(),
                futures_price: quote.futures_price(),
                forward_basis: quote.forward_basis(),
                put_strikes: quote.put_schedule().len(),
                quoted_at: quote.quoted_at(),
            },
            ranking: self.engine.rank(&floors),
            strategy: self.engine.strategy_name(),
            recommendation,
        })
    }

    async fn evaluate(
        &self,
        request: &HedgeRequest,
        ctx: &FetchContext,
    ) -> HedgeResult<(FloorCalculation, HedgeRecommendation)> {
        let result = self.calculate(request, ctx).await;
        if let Err(e) = &result {
            tracing::warn!(
                commodity = %request.commodity,
                volume_tonnes = request.volume_tonnes,
                code = e.code(),
                error = %e,
                "hedge price request failed"
            );
        }
        result
    }

    async fn calculate(
        &self,
        request: &HedgeRequest,
        ctx: &FetchContext,
    ) -> HedgeResult<(FloorCalculation, HedgeRecommendation)> {
        let calculation = self.calculator.quote_all(request, ctx).await?;
        let recommended = self.engine.recommend_set(&calculation.floors)?;

        let recommendation = HedgeRecommendation::new(
            calculation.request.commodity().clone(),
            calculation.request.volume(),
            calculation.floors.clone(),
            recommended,
            calculation.quote.quoted_at(),
        )
        .with_term_months(calculation.request.term_months());

        tracing::info!(
            commodity = %recommendation.commodity(),
            volume_tonnes = %recommendation.volume().get(),
            term_months = recommendation.term_months(),
            recommended = %recommended,
            available = calculation.floors.available_count(),
            "hedge recommendation"
        );

        if let Some(sink) = &self.audit {
            sink.record(&AuditRecord::from_recommendation(&recommendation));
        }

        Ok((calculation, recommendation))
    }
}

fn request(volume_tonnes: f64, commodity: Option<&str>) -> HedgeRequest {
    HedgeRequest::new(commodity.unwrap_or(DEFAULT_COMMODITY), volume_tonnes)
}
