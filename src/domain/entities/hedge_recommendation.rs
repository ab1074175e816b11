//! # Hedge Recommendation
//!
//! The response object: the three floors in canonical order plus the
//! instrument the recommendation engine selected. Immutable once built.

use crate::domain::entities::floor_quote::{FloorQuote, FloorSet};
use crate::domain::entities::hedge_request::DEFAULT_TERM_MONTHS;
use crate::domain::value_objects::{Commodity, HedgeInstrument, Timestamp, VolumeTonnes};
use serde::Serialize;

/// Floors for every instrument and the recommended one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HedgeRecommendation {
    commodity: Commodity,
    volume: VolumeTonnes,
    term_months: u8,
    floors: FloorSet,
    recommended: HedgeInstrument,
    quoted_at: Timestamp,
    calculated_at: Timestamp,
}

impl HedgeRecommendation {
    /// Creates a recommendation.
    #[must_use]
    pub fn new(
        commodity: Commodity,
        volume: VolumeTonnes,
        floors: FloorSet,
        recommended: HedgeInstrument,
        quoted_at: Timestamp,
    ) -> Self {
        Self {
            commodity,
            volume,
            term_months: DEFAULT_TERM_MONTHS,
            floors,
            recommended,
            quoted_at,
            calculated_at: Timestamp::now(),
        }
    }

    /// Sets the hedge term.
    #[must_use]
    pub fn with_term_months(mut self, months: u8) -> Self {
        self.term_months = months;
        self
    }

    /// Returns the commodity.
    #[inline]
    #[must_use]
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// Returns the hedged volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> VolumeTonnes {
        self.volume
    }

    /// Returns the hedge term in months.
    #[inline]
    #[must_use]
    pub fn term_months(&self) -> u8 {
        self.term_months
    }

    /// Returns the floors in canonical order.
    #[inline]
    #[must_use]
    pub fn floors(&self) -> &FloorSet {
        &self.floors
    }

    /// Returns the floor for one instrument.
    #[must_use]
    pub fn floor(&self, instrument: HedgeInstrument) -> &FloorQuote {
        self.floors.get(instrument)
    }

    /// Returns the recommended instrument.
    #[inline]
    #[must_use]
    pub fn recommended(&self) -> HedgeInstrument {
        self.recommended
    }

    /// Returns when the underlying market data was observed.
    #[inline]
    #[must_use]
    pub fn quoted_at(&self) -> Timestamp {
        self.quoted_at
    }

    /// Returns when the recommendation was built.
    #[inline]
    #[must_use]
    pub fn calculated_at(&self) -> Timestamp {
        self.calculated_at
    }

    /// Returns warnings for unavailable or degenerate floors.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.floors.warnings()
    }
}
