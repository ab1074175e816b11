//! # Market Quote Entity
//!
//! Immutable snapshot of the market data one floor computation needs.
//!
//! A [`MarketQuote`] carries the futures price, the put option schedule
//! (strike/premium pairs) and the forward basis for a commodity, stamped with
//! the time the data was observed. It is owned by the request that fetched it
//! and discarded once the response is built.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::domain::entities::market_quote::MarketQuote;
//! use hedgefarm_pricer::domain::value_objects::{Commodity, Timestamp};
//! use rust_decimal::Decimal;
//!
//! let quote = MarketQuote::single_put(
//!     Commodity::wheat(),
//!     Decimal::new(15000, 0),
//!     Decimal::new(300, 0),
//!     Decimal::new(14800, 0),
//!     Decimal::new(-200, 0),
//!     Timestamp::now(),
//! )
//! .unwrap();
//!
//! assert_eq!(quote.put_schedule().len(), 1);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Commodity, Price, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// One strike of a put option chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PutOption {
    strike: Price,
    premium: Price,
}

impl PutOption {
    /// Creates a put option quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMarketQuote` if the strike is not positive
    /// or the premium is negative.
    pub fn new(strike: Decimal, premium: Decimal) -> DomainResult<Self> {
        if strike <= Decimal::ZERO {
            return Err(DomainError::invalid_quote(format!(
                "put strike must be positive, got {strike}"
            )));
        }
        let premium = Price::new(premium).map_err(|_| {
            DomainError::invalid_quote(format!("put premium must not be negative, got {premium}"))
        })?;
        let strike = Price::new(strike)
            .map_err(|e| DomainError::invalid_quote(format!("put strike: {e}")))?;
        Ok(Self { strike, premium })
    }

    /// Returns the strike price.
    #[inline]
    #[must_use]
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Returns the premium paid per tonne.
    #[inline]
    #[must_use]
    pub fn premium(&self) -> Price {
        self.premium
    }
}

/// Market data snapshot for one commodity.
///
/// # Invariants
///
/// - Futures price is strictly positive
/// - Every put strike is strictly positive and every premium non-negative
/// - The put schedule is sorted by ascending strike
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketQuote {
    commodity: Commodity,
    futures_price: Price,
    put_schedule: Vec<PutOption>,
    /// Signed offset of the forward price versus the futures price.
    forward_basis: Decimal,
    quoted_at: Timestamp,
}

impl MarketQuote {
    /// Creates a validated market quote.
    ///
    /// The put schedule may be empty; the put model then reports the floor as
    /// unavailable rather than failing the whole quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMarketQuote` if the futures price is not
    /// positive.
    pub fn new(
        commodity: Commodity,
        futures_price: Decimal,
        mut put_schedule: Vec<PutOption>,
        forward_basis: Decimal,
        quoted_at: Timestamp,
    ) -> DomainResult<Self> {
        if futures_price <= Decimal::ZERO {
            return Err(DomainError::invalid_quote(format!(
                "futures price must be positive, got {futures_price}"
            )));
        }
        let futures_price = Price::new(futures_price)
            .map_err(|e| DomainError::invalid_quote(format!("futures price: {e}")))?;
        put_schedule.sort_by_key(PutOption::strike);

        Ok(Self {
            commodity,
            futures_price,
            put_schedule,
            forward_basis,
            quoted_at,
        })
    }

    /// Creates a quote with a single put strike.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMarketQuote` if any value fails validation.
    pub fn single_put(
        commodity: Commodity,
        futures_price: Decimal,
        put_premium: Decimal,
        put_strike: Decimal,
        forward_basis: Decimal,
        quoted_at: Timestamp,
    ) -> DomainResult<Self> {
        let put = PutOption::new(put_strike, put_premium)?;
        Self::new(commodity, futures_price, vec![put], forward_basis, quoted_at)
    }

    /// Returns the commodity.
    #[inline]
    #[must_use]
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// Returns the futures price.
    #[inline]
    #[must_use]
    pub fn futures_price(&self) -> Price {
        self.futures_price
    }

    /// Returns the put schedule sorted by ascending strike.
    #[inline]
    #[must_use]
    pub fn put_schedule(&self) -> &[PutOption] {
        &self.put_schedule
    }

    /// Returns the forward basis.
    #[inline]
    #[must_use]
    pub fn forward_basis(&self) -> Decimal {
        self.forward_basis
    }

    /// Returns when the data was observed.
    #[inline]
    #[must_use]
    pub fn quoted_at(&self) -> Timestamp {
        self.quoted_at
    }

    /// Returns the quote's age in seconds at `now`.
    #[must_use]
    pub fn age_secs(&self, now: &Timestamp) -> u64 {
        self.quoted_at.age_secs_at(now)
    }

    /// Returns true if the quote is older than `max_age_secs` at `now`.
    #[must_use]
    pub fn is_stale(&self, now: &Timestamp, max_age_secs: u64) -> bool {
        self.age_secs(now) > max_age_secs
    }

    /// Returns a copy of this quote observed at `quoted_at`.
    #[must_use]
    pub fn restamped(&self, quoted_at: Timestamp) -> Self {
        Self {
            quoted_at,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn single_put_builds_one_strike() {
        let q = MarketQuote::single_put(
            Commodity::wheat(),
            d(15000),
            d(300),
            d(14800),
            d(-200),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(q.futures_price().get(), d(15000));
        assert_eq!(q.put_schedule()[0].strike().get(), d(14800));
        assert_eq!(q.put_schedule()[0].premium().get(), d(300));
        assert_eq!(q.forward_basis(), d(-200));
    }

    #[test]
    fn rejects_non_positive_futures_price() {
        let result = MarketQuote::new(Commodity::wheat(), d(0), vec![], d(0), Timestamp::now());
        assert!(matches!(result, Err(DomainError::InvalidMarketQuote(_))));
    }

    #[test]
    fn rejects_negative_premium_and_zero_strike() {
        assert!(PutOption::new(d(15000), d(-1)).is_err());
        assert!(PutOption::new(d(0), d(10)).is_err());
        assert!(PutOption::new(d(15000), d(0)).is_ok());
    }

    #[test]
    fn schedule_is_sorted_by_strike() {
        let schedule = vec![
            PutOption::new(d(16000), d(100)).unwrap(),
            PutOption::new(d(15000), d(300)).unwrap(),
            PutOption::new(d(15500), d(200)).unwrap(),
        ];
        let q = MarketQuote::new(Commodity::wheat(), d(15500), schedule, d(0), Timestamp::now())
            .unwrap();
        let strikes: Vec<_> = q.put_schedule().iter().map(|p| p.strike().get()).collect();
        assert_eq!(strikes, vec![d(15000), d(15500), d(16000)]);
    }

    #[test]
    fn staleness_uses_quote_time() {
        let quoted_at = Timestamp::from_secs(1_000).unwrap();
        let q = MarketQuote::new(Commodity::wheat(), d(15000), vec![], d(0), quoted_at).unwrap();
        let now = Timestamp::from_secs(1_400).unwrap();
        assert_eq!(q.age_secs(&now), 400);
        assert!(q.is_stale(&now, 300));
        assert!(!q.is_stale(&now, 400));

        let fresh = q.restamped(now);
        assert_eq!(fresh.age_secs(&now), 0);
        assert_eq!(fresh.futures_price(), q.futures_price());
    }
}
