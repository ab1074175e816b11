//! # Floor Quote
//!
//! The floor price one instrument model produced for a request.
//!
//! A floor is either a numeric price or the *unavailable* sentinel, which is
//! deliberately distinct from a numeric zero: a zero floor is a computed
//! (degenerate) result, an unavailable floor could not be computed at all.
//!
//! [`FloorSet`] holds exactly one floor per instrument and always yields them
//! in canonical order: Futures, Put, Forward.

use crate::domain::value_objects::{HedgeInstrument, Price, VolumeTonnes};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Computed floor value or the unavailable sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FloorValue {
    /// The model produced a floor price.
    Available {
        /// Floor in currency per tonne.
        price: Price,
    },
    /// The model could not produce a floor.
    Unavailable {
        /// Why the floor is missing.
        reason: String,
    },
}

/// Cost components behind a floor, reported by the detailed breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "instrument", rename_all = "snake_case")]
pub enum FloorComponents {
    /// Futures hedge: futures price less the margin drag for the volume.
    Futures {
        /// Futures price used.
        futures_price: Price,
        /// Margin and financing cost per tonne for this volume.
        margin_cost_per_tonne: Decimal,
        /// Margin cost over the full volume.
        total_margin_cost: Decimal,
    },
    /// Protective put: strike less premium.
    Put {
        /// Futures price rounded to the strike increment.
        target_strike: Decimal,
        /// Strike actually used.
        strike: Price,
        /// Premium paid for that strike.
        premium: Price,
    },
    /// Forward contract: futures price plus basis, less any bulk discount.
    Forward {
        /// Futures price used.
        futures_price: Price,
        /// Signed basis applied.
        basis: Decimal,
        /// Volume above the bulk threshold.
        excess_volume_tonnes: Decimal,
        /// Discount per tonne applied for the excess volume.
        bulk_discount_per_tonne: Decimal,
    },
}

/// Floor quote for one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorQuote {
    instrument: HedgeInstrument,
    value: FloorValue,
    volume: VolumeTonnes,
    /// True when the raw model output was negative and clamped to zero.
    degenerate: bool,
    components: Option<FloorComponents>,
}

impl FloorQuote {
    /// Creates an available floor.
    #[must_use]
    pub fn available(
        instrument: HedgeInstrument,
        price: Price,
        volume: VolumeTonnes,
        components: FloorComponents,
    ) -> Self {
        Self {
            instrument,
            value: FloorValue::Available { price },
            volume,
            degenerate: false,
            components: Some(components),
        }
    }

    /// Creates a floor that was clamped at zero.
    #[must_use]
    pub fn degenerate(
        instrument: HedgeInstrument,
        volume: VolumeTonnes,
        components: FloorComponents,
    ) -> Self {
        Self {
            instrument,
            value: FloorValue::Available { price: Price::ZERO },
            volume,
            degenerate: true,
            components: Some(components),
        }
    }

    /// Creates the unavailable sentinel for an instrument.
    #[must_use]
    pub fn unavailable(
        instrument: HedgeInstrument,
        volume: VolumeTonnes,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            instrument,
            value: FloorValue::Unavailable {
                reason: reason.into(),
            },
            volume,
            degenerate: false,
            components: None,
        }
    }

    /// Returns the instrument.
    #[inline]
    #[must_use]
    pub fn instrument(&self) -> HedgeInstrument {
        self.instrument
    }

    /// Returns the floor value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &FloorValue {
        &self.value
    }

    /// Returns the floor price, or `None` for the unavailable sentinel.
    #[must_use]
    pub fn floor_price(&self) -> Option<Price> {
        match self.value {
            FloorValue::Available { price } => Some(price),
            FloorValue::Unavailable { .. } => None,
        }
    }

    /// Returns true if a floor price was computed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self.value, FloorValue::Available { .. })
    }

    /// Returns true if the floor was clamped at zero.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Returns the volume the floor was computed for.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> VolumeTonnes {
        self.volume
    }

    /// Returns the cost components, if the floor was computed.
    #[inline]
    #[must_use]
    pub fn components(&self) -> Option<&FloorComponents> {
        self.components.as_ref()
    }

    /// Returns a consumer-facing warning for unavailable or degenerate floors.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match &self.value {
            FloorValue::Unavailable { reason } => {
                Some(format!("{} floor unavailable: {}", self.instrument, reason))
            }
            FloorValue::Available { .. } if self.degenerate => Some(format!(
                "{} floor clamped at zero: costs exceed the market price",
                self.instrument
            )),
            FloorValue::Available { .. } => None,
        }
    }
}

impl fmt::Display for FloorQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.floor_price() {
            Some(price) => write!(f, "{}={}", self.instrument, price),
            None => write!(f, "{}=unavailable", self.instrument),
        }
    }
}

/// One floor per instrument, iterated in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorSet {
    futures: FloorQuote,
    put: FloorQuote,
    forward: FloorQuote,
}

impl FloorSet {
    /// Creates a floor set.
    ///
    /// Returns `None` if any quote is filed under the wrong instrument.
    #[must_use]
    pub fn new(futures: FloorQuote, put: FloorQuote, forward: FloorQuote) -> Option<Self> {
        let in_place = futures.instrument() == HedgeInstrument::Futures
            && put.instrument() == HedgeInstrument::Put
            && forward.instrument() == HedgeInstrument::Forward;
        in_place.then_some(Self {
            futures,
            put,
            forward,
        })
    }

    /// Returns the floor for an instrument.
    #[must_use]
    pub fn get(&self, instrument: HedgeInstrument) -> &FloorQuote {
        match instrument {
            HedgeInstrument::Futures => &self.futures,
            HedgeInstrument::Put => &self.put,
            HedgeInstrument::Forward => &self.forward,
        }
    }

    /// Iterates the floors in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &FloorQuote> {
        [&self.futures, &self.put, &self.forward].into_iter()
    }

    /// Returns the floors as an ordered vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<FloorQuote> {
        self.iter().cloned().collect()
    }

    /// Returns the number of floors that were computed.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.iter().filter(|q| q.is_available()).count()
    }

    /// Returns warnings for every unavailable or degenerate floor, in order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.iter().filter_map(FloorQuote::warning).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn volume() -> VolumeTonnes {
        VolumeTonnes::new(Decimal::new(1000, 0)).unwrap()
    }

    fn forward_components() -> FloorComponents {
        FloorComponents::Forward {
            futures_price: Price::new(Decimal::new(15000, 0)).unwrap(),
            basis: Decimal::new(-200, 0),
            excess_volume_tonnes: Decimal::ZERO,
            bulk_discount_per_tonne: Decimal::ZERO,
        }
    }

    fn price(v: i64) -> Price {
        Price::new(Decimal::new(v, 0)).unwrap()
    }

    #[test]
    fn sentinel_differs_from_zero() {
        let zero = FloorQuote::degenerate(HedgeInstrument::Forward, volume(), forward_components());
        let missing = FloorQuote::unavailable(HedgeInstrument::Forward, volume(), "no data");
        assert_eq!(zero.floor_price(), Some(Price::ZERO));
        assert!(zero.is_degenerate());
        assert_eq!(missing.floor_price(), None);
        assert_ne!(zero, missing);
    }

    #[test]
    fn warnings_cover_sentinel_and_degenerate() {
        let zero = FloorQuote::degenerate(HedgeInstrument::Forward, volume(), forward_components());
        let missing = FloorQuote::unavailable(HedgeInstrument::Put, volume(), "no strike");
        assert!(zero.warning().unwrap().contains("clamped"));
        assert!(missing.warning().unwrap().contains("no strike"));

        let ok = FloorQuote::available(
            HedgeInstrument::Forward,
            price(14800),
            volume(),
            forward_components(),
        );
        assert!(ok.warning().is_none());
    }

    #[test]
    fn floor_set_rejects_misplaced_instruments() {
        let a = FloorQuote::unavailable(HedgeInstrument::Put, volume(), "x");
        let b = FloorQuote::unavailable(HedgeInstrument::Futures, volume(), "x");
        let c = FloorQuote::unavailable(HedgeInstrument::Forward, volume(), "x");
        assert!(FloorSet::new(a.clone(), b.clone(), c.clone()).is_none());
        assert!(FloorSet::new(b, a, c).is_some());
    }

    #[test]
    fn floor_set_iterates_in_canonical_order() {
        let set = FloorSet::new(
            FloorQuote::unavailable(HedgeInstrument::Futures, volume(), "x"),
            FloorQuote::unavailable(HedgeInstrument::Put, volume(), "y"),
            FloorQuote::available(
                HedgeInstrument::Forward,
                price(1),
                volume(),
                forward_components(),
            ),
        )
        .unwrap();
        let order: Vec<_> = set.iter().map(FloorQuote::instrument).collect();
        assert_eq!(order, HedgeInstrument::CANONICAL_ORDER.to_vec());
        assert_eq!(set.available_count(), 1);
        assert_eq!(set.warnings().len(), 2);
    }

    #[test]
    fn display_shows_sentinel() {
        let missing = FloorQuote::unavailable(HedgeInstrument::Put, volume(), "no strike");
        assert_eq!(missing.to_string(), "put=unavailable");
    }
}
