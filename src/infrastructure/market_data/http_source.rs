//! # HTTP Quote Source
//!
//! [`MarketQuoteSource`] backed by a JSON market data service.
//!
//! The service exposes `GET {base_url}/quotes/{commodity}` and answers with
//! a [`QuotePayload`]. A 404 means the service has no data for the
//! commodity.

use crate::domain::entities::{MarketQuote, PutOption};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{Commodity, Timestamp};
use crate::infrastructure::market_data::error::{MarketDataError, MarketDataResult};
use crate::infrastructure::market_data::traits::MarketQuoteSource;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One put strike as sent by the market data service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutPayload {
    /// Strike price per tonne.
    pub strike: Decimal,
    /// Premium per tonne.
    pub premium: Decimal,
}

/// Quote body returned by the market data service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotePayload {
    /// Commodity identifier.
    pub commodity: Commodity,
    /// Futures price per tonne.
    pub futures_price: Decimal,
    /// Put option chain.
    #[serde(default)]
    pub put_schedule: Vec<PutPayload>,
    /// Signed forward basis per tonne.
    pub forward_basis: Decimal,
    /// Observation time.
    pub quoted_at: Timestamp,
}

impl QuotePayload {
    /// Converts the payload into a validated quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMarketQuote` if any value fails validation.
    pub fn into_quote(self) -> DomainResult<MarketQuote> {
        let schedule = self
            .put_schedule
            .into_iter()
            .map(|p| PutOption::new(p.strike, p.premium))
            .collect::<DomainResult<Vec<_>>>()?;
        MarketQuote::new(
            self.commodity,
            self.futures_price,
            schedule,
            self.forward_basis,
            self.quoted_at,
        )
    }
}

/// HTTP market data client.
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpQuoteSource {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> MarketDataResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| MarketDataError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_ms,
        })
    }

    /// Returns the service base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn quote_url(&self, commodity: &Commodity) -> String {
        format!("{}/quotes/{}", self.base_url, commodity.as_str())
    }

    async fn handle_response(&self, response: Response) -> MarketDataResult<Option<QuotePayload>> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return response
                .json::<QuotePayload>()
                .await
                .map(Some)
                .map_err(|e| MarketDataError::protocol(format!("failed to parse quote: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            Err(MarketDataError::connection(format!(
                "market data service returned {status}: {body}"
            )))
        } else {
            Err(MarketDataError::protocol(format!(
                "unexpected status {status}: {body}"
            )))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> MarketDataError {
        if error.is_timeout() {
            MarketDataError::timeout_with_duration("quote request timed out", self.timeout_ms)
        } else if error.is_connect() {
            MarketDataError::connection(format!("connection failed: {error}"))
        } else {
            MarketDataError::connection(format!("HTTP request failed: {error}"))
        }
    }
}

#[async_trait]
impl MarketQuoteSource for HttpQuoteSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_quote(
        &self,
        commodity: &Commodity,
        max_age_secs: u64,
    ) -> MarketDataResult<Option<MarketQuote>> {
        let response = self
            .client
            .get(self.quote_url(commodity))
            .query(&[("max_age_secs", max_age_secs)])
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let Some(payload) = self.handle_response(response).await? else {
            return Ok(None);
        };
        let quote = payload
            .into_quote()
            .map_err(|e| MarketDataError::protocol(e.to_string()))?;

        let now = Timestamp::now();
        if quote.is_stale(&now, max_age_secs) {
            return Err(MarketDataError::stale(
                commodity.as_str(),
                quote.age_secs(&now),
                max_age_secs,
            ));
        }
        Ok(Some(quote))
    }
}
