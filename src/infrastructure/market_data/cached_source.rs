//! # Cached Quote Source
//!
//! Decorator that reuses a quote across requests within a freshness window.
//!
//! Without this wrapper every request fetches its own quote. With it, a quote
//! younger than the window (and than the caller's `max_age_secs`) is served
//! from memory.

use crate::domain::entities::MarketQuote;
use crate::domain::value_objects::{Commodity, Timestamp};
use crate::infrastructure::market_data::error::MarketDataResult;
use crate::infrastructure::market_data::traits::MarketQuoteSource;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Market quote source with a per-commodity freshness cache.
#[derive(Debug)]
pub struct CachedQuoteSource {
    inner: Arc<dyn MarketQuoteSource>,
    freshness_secs: u64,
    cache: DashMap<Commodity, MarketQuote>,
}

impl CachedQuoteSource {
    /// Wraps `inner`, reusing quotes for up to `freshness_secs`.
    #[must_use]
    pub fn new(inner: Arc<dyn MarketQuoteSource>, freshness_secs: u64) -> Self {
        Self {
            inner,
            freshness_secs,
            cache: DashMap::new(),
        }
    }

    /// Returns the freshness window in seconds.
    #[inline]
    #[must_use]
    pub fn freshness_secs(&self) -> u64 {
        self.freshness_secs
    }

    /// Returns the number of cached quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops the cached quote for a commodity.
    pub fn invalidate(&self, commodity: &Commodity) {
        self.cache.remove(commodity);
    }

    fn cached(&self, commodity: &Commodity, max_age_secs: u64) -> Option<MarketQuote> {
        let window = self.freshness_secs.min(max_age_secs);
        let now = Timestamp::now();
        self.cache
            .get(commodity)
            .filter(|entry| !entry.value().is_stale(&now, window))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl MarketQuoteSource for CachedQuoteSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn get_quote(
        &self,
        commodity: &Commodity,
        max_age_secs: u64,
    ) -> MarketDataResult<Option<MarketQuote>> {
        if let Some(quote) = self.cached(commodity, max_age_secs) {
            tracing::debug!(%commodity, source = self.inner.name(), "serving cached quote");
            return Ok(Some(quote));
        }

        let fetched = self.inner.get_quote(commodity, max_age_secs).await?;
        match &fetched {
            Some(quote) => {
                self.cache.insert(commodity.clone(), quote.clone());
            }
            None => {
                self.cache.remove(commodity);
            }
        }
        Ok(fetched)
    }
}
