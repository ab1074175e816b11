//! # Static Quote Source
//!
//! In-memory implementation of [`MarketQuoteSource`].
//!
//! Quotes are held per commodity in a thread-safe map. In *live* mode every
//! read restamps the quote with the current time, which is how the demo feed
//! behaves: the prices are fixed but always current.

use crate::domain::entities::{MarketQuote, PutOption};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{Commodity, Timestamp};
use crate::infrastructure::market_data::error::{MarketDataError, MarketDataResult};
use crate::infrastructure::market_data::traits::MarketQuoteSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Demo wheat futures price.
const DEMO_FUTURES_PRICE: Decimal = Decimal::from_parts(16500, 0, 0, false, 0);

/// Demo strikes as percentages of the futures price.
const DEMO_STRIKE_PCTS: [i64; 5] = [95, 97, 100, 103, 105];

/// Demo forward basis.
const DEMO_FORWARD_BASIS: Decimal = Decimal::from_parts(250, 0, 0, true, 0);

/// In-memory market quote source.
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteSource {
    quotes: Arc<RwLock<HashMap<Commodity, MarketQuote>>>,
    live: bool,
}

impl StaticQuoteSource {
    /// Creates an empty source that returns quotes with their stored timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty source that restamps quotes on every read.
    #[must_use]
    pub fn live() -> Self {
        Self {
            live: true,
            ..Self::default()
        }
    }

    /// Creates a live source seeded with the demo wheat chain.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the demo chain fails validation.
    pub fn demo() -> DomainResult<Self> {
        let quote = demo_wheat_quote(Timestamp::now())?;
        let mut quotes = HashMap::new();
        quotes.insert(quote.commodity().clone(), quote);
        Ok(Self {
            quotes: Arc::new(RwLock::new(quotes)),
            live: true,
        })
    }

    /// Creates a source from a list of quotes.
    #[must_use]
    pub fn with_quotes(quotes: impl IntoIterator<Item = MarketQuote>) -> Self {
        let map = quotes
            .into_iter()
            .map(|q| (q.commodity().clone(), q))
            .collect();
        Self {
            quotes: Arc::new(RwLock::new(map)),
            live: false,
        }
    }

    /// Stores or replaces the quote for its commodity.
    pub async fn insert(&self, quote: MarketQuote) {
        let mut quotes = self.quotes.write().await;
        quotes.insert(quote.commodity().clone(), quote);
    }

    /// Removes the quote for a commodity.
    pub async fn remove(&self, commodity: &Commodity) -> Option<MarketQuote> {
        let mut quotes = self.quotes.write().await;
        quotes.remove(commodity)
    }

    /// Returns the commodities with stored quotes.
    pub async fn commodities(&self) -> Vec<Commodity> {
        let quotes = self.quotes.read().await;
        let mut list: Vec<_> = quotes.keys().cloned().collect();
        list.sort();
        list
    }
}

#[async_trait]
impl MarketQuoteSource for StaticQuoteSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn get_quote(
        &self,
        commodity: &Commodity,
        max_age_secs: u64,
    ) -> MarketDataResult<Option<MarketQuote>> {
        let quotes = self.quotes.read().await;
        let Some(quote) = quotes.get(commodity) else {
            return Ok(None);
        };

        let now = Timestamp::now();
        if self.live {
            return Ok(Some(quote.restamped(now)));
        }
        if quote.is_stale(&now, max_age_secs) {
            return Err(MarketDataError::stale(
                commodity.as_str(),
                quote.age_secs(&now),
                max_age_secs,
            ));
        }
        Ok(Some(quote.clone()))
    }
}

/// Builds the demo wheat chain: five strikes around the futures price with
/// premiums growing with distance from the money.
///
/// # Errors
///
/// Returns a domain error if the chain fails validation.
pub fn demo_wheat_quote(quoted_at: Timestamp) -> DomainResult<MarketQuote> {
    let premium_slope = Decimal::new(1, 1);
    let premium_floor = Decimal::new(50, 0);
    let schedule = DEMO_STRIKE_PCTS
        .iter()
        .map(|pct| {
            let strike = DEMO_FUTURES_PRICE * Decimal::new(*pct, 2);
            let distance = (DEMO_FUTURES_PRICE - strike).abs();
            PutOption::new(strike, distance * premium_slope + premium_floor)
        })
        .collect::<DomainResult<Vec<_>>>()?;

    MarketQuote::new(
        Commodity::wheat(),
        DEMO_FUTURES_PRICE,
        schedule,
        DEMO_FORWARD_BASIS,
        quoted_at,
    )
}
