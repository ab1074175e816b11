//! # Hedge Request
//!
//! Inbound request for price floors, before and after validation.
//!
//! [`HedgeRequest`] holds the raw values received at the boundary.
//! [`ValidatedHedgeRequest`] is produced by the floor calculator once the
//! commodity is known to be supported, the volume is a finite positive
//! number within the configured maximum and the hedge term is between
//! 1 and 12 months.
//!
//! The term is carried through to the response and audit trail; the floor
//! models do not depend on it.

use crate::domain::value_objects::commodity::DEFAULT_COMMODITY;
use crate::domain::value_objects::{Commodity, VolumeTonnes};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Hedge term used when the request does not name one.
pub const DEFAULT_TERM_MONTHS: u8 = 6;

/// Accepted hedge terms in months.
pub const TERM_MONTHS_RANGE: RangeInclusive<u8> = 1..=12;

/// Unvalidated hedge request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeRequest {
    /// Commodity identifier as received.
    pub commodity: String,
    /// Volume to hedge in tonnes, as received.
    pub volume_tonnes: f64,
    /// Hedge term in months as received, default 6.
    #[serde(default)]
    pub term_months: Option<i64>,
}

impl HedgeRequest {
    /// Creates a request for the given commodity and volume.
    #[must_use]
    pub fn new(commodity: impl Into<String>, volume_tonnes: f64) -> Self {
        Self {
            commodity: commodity.into(),
            volume_tonnes,
            term_months: None,
        }
    }

    /// Sets the hedge term.
    #[must_use]
    pub fn with_term_months(mut self, months: Option<i64>) -> Self {
        self.term_months = months;
        self
    }

    /// Creates a request for the default commodity (`wheat`).
    #[must_use]
    pub fn wheat(volume_tonnes: f64) -> Self {
        Self::new(DEFAULT_COMMODITY, volume_tonnes)
    }
}

/// Hedge request whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedHedgeRequest {
    commodity: Commodity,
    volume: VolumeTonnes,
    term_months: u8,
}

impl ValidatedHedgeRequest {
    /// Creates a validated request with the default term. Callers are
    /// responsible for the range checks the floor calculator performs.
    #[must_use]
    pub fn new(commodity: Commodity, volume: VolumeTonnes) -> Self {
        Self {
            commodity,
            volume,
            term_months: DEFAULT_TERM_MONTHS,
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

    /// Returns the volume.
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
}
