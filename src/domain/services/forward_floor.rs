//! # Forward Floor Model
//!
//! Floor = futures price + basis − bulk discount.
//!
//! Counterparties quote lower forward prices for very large deliveries: every
//! tonne above the bulk threshold lowers the per-tonne price by the
//! configured discount rate.

use crate::domain::entities::{FloorComponents, FloorQuote, MarketQuote};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::instrument_model::{InstrumentModel, clamp_floor};
use crate::domain::services::model_config::{
    DEFAULT_BULK_DISCOUNT_RATE, DEFAULT_BULK_THRESHOLD_TONNES,
};
use crate::domain::value_objects::{CheckedArithmetic, HedgeInstrument, VolumeTonnes};
use rust_decimal::Decimal;

/// Bilateral forward contract hedge.
#[derive(Debug, Clone, Copy)]
pub struct ForwardFloorModel {
    bulk_threshold_tonnes: Decimal,
    bulk_discount_rate: Decimal,
}

impl ForwardFloorModel {
    /// Creates a forward model.
    #[must_use]
    pub fn new(bulk_threshold_tonnes: Decimal, bulk_discount_rate: Decimal) -> Self {
        Self {
            bulk_threshold_tonnes,
            bulk_discount_rate,
        }
    }
}

impl Default for ForwardFloorModel {
    fn default() -> Self {
        Self::new(DEFAULT_BULK_THRESHOLD_TONNES, DEFAULT_BULK_DISCOUNT_RATE)
    }
}

impl InstrumentModel for ForwardFloorModel {
    fn instrument(&self) -> HedgeInstrument {
        HedgeInstrument::Forward
    }

    fn compute_floor(
        &self,
        quote: &MarketQuote,
        volume: VolumeTonnes,
    ) -> DomainResult<FloorQuote> {
        let arithmetic = |e| DomainError::arithmetic(HedgeInstrument::Forward, e);

        let futures_price = quote.futures_price();
        let basis = quote.forward_basis();
        let excess_volume_tonnes = volume
            .get()
            .safe_sub(self.bulk_threshold_tonnes)
            .map_err(arithmetic)?
            .max(Decimal::ZERO);
        let bulk_discount_per_tonne = self
            .bulk_discount_rate
            .safe_mul(excess_volume_tonnes)
            .map_err(arithmetic)?;
        let raw = futures_price
            .get()
            .safe_add(basis)
            .and_then(|p| p.safe_sub(bulk_discount_per_tonne))
            .map_err(arithmetic)?;

        Ok(clamp_floor(
            HedgeInstrument::Forward,
            raw,
            volume,
            FloorComponents::Forward {
                futures_price,
                basis,
                excess_volume_tonnes,
                bulk_discount_per_tonne,
            },
        ))
    }
}
