//! # Floor Price Calculator
//!
//! Validates a hedge request, fetches one market quote and runs the three
//! instrument models over it.
//!
//! Floors always come back in canonical order (Futures, Put, Forward). A
//! model failure degrades only that instrument to the unavailable sentinel;
//! the request fails only when the quote fetch fails or every model fails.
//! The fetch is bounded by a timeout and can be cancelled through a
//! [`FetchContext`]. Nothing is retried here.

use crate::application::error::{HedgeError, HedgeResult};
use crate::application::services::recommendation::no_viable_instrument;
use crate::domain::entities::hedge_request::{DEFAULT_TERM_MONTHS, TERM_MONTHS_RANGE};
use crate::domain::entities::{
    FloorQuote, FloorSet, HedgeRequest, MarketQuote, ValidatedHedgeRequest,
};
use crate::domain::services::{InstrumentModelSet, ModelConfig};
use crate::domain::value_objects::{Commodity, HedgeInstrument, Timestamp, VolumeTonnes};
use crate::infrastructure::market_data::MarketQuoteSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

/// Field name of the volume in the consumer contract.
pub const VOLUME_FIELD: &str = "volumeTonnes";

/// Field name of the commodity in the consumer contract.
pub const COMMODITY_FIELD: &str = "commodity";

/// Field name of the hedge term in the consumer contract.
pub const TERM_FIELD: &str = "term_m";

/// Configuration for the floor calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Largest volume accepted, in tonnes.
    pub max_volume_tonnes: Decimal,
    /// Oldest market quote accepted, in seconds.
    pub max_quote_age_secs: u64,
    /// Default quote fetch timeout in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Commodities the pricer quotes.
    pub supported_commodities: Vec<Commodity>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_volume_tonnes: Decimal::new(100_000, 0),
            max_quote_age_secs: 300,
            fetch_timeout_ms: 5000,
            supported_commodities: vec![Commodity::wheat()],
        }
    }
}

impl CalculatorConfig {
    /// Sets the maximum volume.
    #[must_use]
    pub fn with_max_volume(mut self, tonnes: Decimal) -> Self {
        self.max_volume_tonnes = tonnes;
        self
    }

    /// Sets the maximum quote age.
    #[must_use]
    pub fn with_max_quote_age(mut self, secs: u64) -> Self {
        self.max_quote_age_secs = secs;
        self
    }

    /// Sets the default fetch timeout.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = timeout_ms;
        self
    }

    /// Sets the supported commodities.
    #[must_use]
    pub fn with_supported_commodities(mut self, commodities: Vec<Commodity>) -> Self {
        self.supported_commodities = commodities;
        self
    }

    /// Returns the default fetch timeout.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Returns true if the commodity is quoted.
    #[must_use]
    pub fn supports(&self, commodity: &Commodity) -> bool {
        self.supported_commodities.contains(commodity)
    }
}

/// Caller-supplied bounds on the quote fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    timeout: Option<Duration>,
    cancel: Option<watch::Receiver<bool>>,
}

impl FetchContext {
    /// Creates a context using the calculator's default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context together with the handle that cancels it.
    #[must_use]
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                timeout: None,
                cancel: Some(rx),
            },
            CancelHandle { tx },
        )
    }

    /// Overrides the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation signal; `true` on the channel cancels.
    #[must_use]
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Returns the timeout override, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns true if cancellation was already requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Cancels the [`FetchContext`] it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Resolves once cancellation is requested; never if the sender is dropped.
async fn cancelled(mut rx: watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn validate_term(raw: Option<i64>) -> HedgeResult<u8> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TERM_MONTHS);
    };
    u8::try_from(raw)
        .ok()
        .filter(|months| TERM_MONTHS_RANGE.contains(months))
        .ok_or_else(|| {
            HedgeError::invalid_request(
                TERM_FIELD,
                format!(
                    "must be between {} and {} months, got {raw}",
                    TERM_MONTHS_RANGE.start(),
                    TERM_MONTHS_RANGE.end()
                ),
            )
        })
}

/// Floors computed for one request, with the inputs that produced them.
#[derive(Debug, Clone)]
pub struct FloorCalculation {
    /// The validated request.
    pub request: ValidatedHedgeRequest,
    /// The quote the models ran on.
    pub quote: MarketQuote,
    /// One floor per instrument, canonical order.
    pub floors: FloorSet,
}

/// Orchestrates validation, the quote fetch and the instrument models.
#[derive(Debug, Clone)]
pub struct FloorPriceCalculator {
    source: Arc<dyn MarketQuoteSource>,
    models: InstrumentModelSet,
    config: CalculatorConfig,
}

impl FloorPriceCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new(
        source: Arc<dyn MarketQuoteSource>,
        models: InstrumentModelSet,
        config: CalculatorConfig,
    ) -> Self {
        Self {
            source,
            models,
            config,
        }
    }

    /// Creates a calculator with the standard models built from `model_config`.
    #[must_use]
    pub fn from_model_config(
        source: Arc<dyn MarketQuoteSource>,
        model_config: &ModelConfig,
        config: CalculatorConfig,
    ) -> Self {
        Self::new(source, InstrumentModelSet::from_config(model_config), config)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validates a raw request.
    ///
    /// # Errors
    ///
    /// Returns `HedgeError::InvalidRequest` naming `volumeTonnes`,
    /// `commodity` or `term_m`.
    pub fn validate(&self, request: &HedgeRequest) -> HedgeResult<ValidatedHedgeRequest> {
        let raw = request.volume_tonnes;
        if !raw.is_finite() {
            return Err(HedgeError::invalid_request(
                VOLUME_FIELD,
                "must be a finite number",
            ));
        }
        if raw <= 0.0 {
            return Err(HedgeError::invalid_request(
                VOLUME_FIELD,
                "must be greater than zero",
            ));
        }
        let volume = VolumeTonnes::from_f64(raw)
            .map_err(|e| HedgeError::invalid_request(VOLUME_FIELD, e.to_string()))?;
        if volume.get() > self.config.max_volume_tonnes {
            return Err(HedgeError::invalid_request(
                VOLUME_FIELD,
                format!(
                    "must not exceed {} tonnes",
                    self.config.max_volume_tonnes
                ),
            ));
        }

        let commodity = Commodity::new(&request.commodity)
            .map_err(|e| HedgeError::invalid_request(COMMODITY_FIELD, e.to_string()))?;
        if !self.config.supports(&commodity) {
            let supported: Vec<_> = self
                .config
                .supported_commodities
                .iter()
                .map(Commodity::as_str)
                .collect();
            return Err(HedgeError::invalid_request(
                COMMODITY_FIELD,
                format!(
                    "unsupported commodity '{commodity}', supported: {}",
                    supported.join(", ")
                ),
            ));
        }

        let term_months = validate_term(request.term_months)?;

        Ok(ValidatedHedgeRequest::new(commodity, volume).with_term_months(term_months))
    }

    /// Reads the quote of the first supported commodity under the default
    /// fetch bounds, as a readiness check of the market data source.
    ///
    /// # Errors
    ///
    /// Returns `QuoteUnavailable` if the source fails, times out, has no
    /// data or serves a stale quote.
    pub async fn check_source(&self) -> HedgeResult<MarketQuote> {
        let commodity = self
            .config
            .supported_commodities
            .first()
            .cloned()
            .unwrap_or_else(Commodity::wheat);
        self.fetch_quote(&commodity, &FetchContext::new()).await
    }

    /// Computes the floor for every instrument.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if validation fails
    /// - `QuoteUnavailable` if the quote is missing, stale or times out
    /// - `Cancelled` if the context is cancelled during the fetch
    /// - `NoViableInstrument` if every model fails
    pub async fn quote_all(
        &self,
        request: &HedgeRequest,
        ctx: &FetchContext,
    ) -> HedgeResult<FloorCalculation> {
        let request = self.validate(request)?;
        let quote = self.fetch_quote(request.commodity(), ctx).await?;
        let floors = self.run_models(&quote, request.volume())?;

        if floors.available_count() == 0 {
            return Err(no_viable_instrument(&floors.to_vec()));
        }

        Ok(FloorCalculation {
            request,
            quote,
            floors,
        })
    }

    /// Fetches exactly one quote, bounded by the context.
    async fn fetch_quote(
        &self,
        commodity: &Commodity,
        ctx: &FetchContext,
    ) -> HedgeResult<MarketQuote> {
        if ctx.is_cancelled() {
            return Err(HedgeError::Cancelled);
        }

        let limit = ctx.timeout().unwrap_or_else(|| self.config.fetch_timeout());
        let max_age = self.config.max_quote_age_secs;
        tracing::debug!(
            %commodity,
            source = self.source.name(),
            timeout_ms = limit.as_millis() as u64,
            "fetching market quote"
        );

        let fetch = timeout(limit, self.source.get_quote(commodity, max_age));
        let outcome = match ctx.cancel.clone() {
            Some(rx) => {
                tokio::select! {
                    biased;
                    () = cancelled(rx) => {
                        tracing::debug!(%commodity, "quote fetch cancelled");
                        return Err(HedgeError::Cancelled);
                    }
                    outcome = fetch => outcome,
                }
            }
            None => fetch.await,
        };

        let quote = match outcome {
            Err(_) => {
                return Err(HedgeError::quote_unavailable(
                    commodity.as_str(),
                    format!("quote fetch timed out after {}ms", limit.as_millis()),
                ));
            }
            Ok(Err(e)) => return Err(HedgeError::from_market_data(commodity.as_str(), &e)),
            Ok(Ok(None)) => {
                return Err(HedgeError::quote_unavailable(
                    commodity.as_str(),
                    "no market data",
                ));
            }
            Ok(Ok(Some(quote))) => quote,
        };

        if quote.commodity() != commodity {
            return Err(HedgeError::quote_unavailable(
                commodity.as_str(),
                format!("source returned a quote for {}", quote.commodity()),
            ));
        }
        let now = Timestamp::now();
        if quote.is_stale(&now, max_age) {
            return Err(HedgeError::quote_unavailable(
                commodity.as_str(),
                format!(
                    "quote is stale: {}s old, max {max_age}s",
                    quote.age_secs(&now)
                ),
            ));
        }

        tracing::debug!(
            %commodity,
            futures_price = %quote.futures_price(),
            quoted_at = %quote.quoted_at(),
            "market quote received"
        );
        Ok(quote)
    }

    /// Runs every model in canonical order, absorbing model failures.
    fn run_models(&self, quote: &MarketQuote, volume: VolumeTonnes) -> HedgeResult<FloorSet> {
        let [futures, put, forward] =
            HedgeInstrument::CANONICAL_ORDER.map(|instrument| self.run_model(instrument, quote, volume));
        FloorSet::new(futures, put, forward)
            .ok_or_else(|| HedgeError::internal("instrument model returned a misplaced floor"))
    }

    fn run_model(
        &self,
        instrument: HedgeInstrument,
        quote: &MarketQuote,
        volume: VolumeTonnes,
    ) -> FloorQuote {
        match self.models.get(instrument).compute_floor(quote, volume) {
            Ok(floor) => {
                if floor.is_degenerate() {
                    tracing::warn!(
                        %instrument,
                        volume_tonnes = %volume.get(),
                        "floor clamped at zero"
                    );
                }
                floor
            }
            Err(e) => {
                tracing::warn!(
                    %instrument,
                    error = %e,
                    model_local = e.is_model_local(),
                    "instrument floor unavailable"
                );
                FloorQuote::unavailable(instrument, volume, e.to_string())
            }
        }
    }
}
