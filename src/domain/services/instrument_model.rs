//! # Instrument Models
//!
//! The [`InstrumentModel`] port and the fixed set of three models the floor
//! calculator runs for every request.
//!
//! Models are pure: they read a [`MarketQuote`] and a validated volume and
//! return a [`FloorQuote`]. They never perform I/O, so the calculator can run
//! them synchronously after the single quote fetch.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::domain::services::instrument_model::InstrumentModelSet;
//! use hedgefarm_pricer::domain::services::model_config::ModelConfig;
//! use hedgefarm_pricer::domain::value_objects::HedgeInstrument;
//!
//! let models = InstrumentModelSet::from_config(&ModelConfig::default());
//! let order: Vec<_> = models.iter().map(|m| m.instrument()).collect();
//! assert_eq!(order, HedgeInstrument::CANONICAL_ORDER.to_vec());
//! ```

use crate::domain::entities::{FloorComponents, FloorQuote, MarketQuote};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::forward_floor::ForwardFloorModel;
use crate::domain::services::futures_floor::FuturesFloorModel;
use crate::domain::services::model_config::ModelConfig;
use crate::domain::services::put_floor::PutFloorModel;
use crate::domain::value_objects::{HedgeInstrument, Price, VolumeTonnes};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Computes the floor price achievable through one hedging instrument.
///
/// Implementations must be deterministic for identical inputs.
pub trait InstrumentModel: Send + Sync + fmt::Debug {
    /// Returns the instrument this model prices.
    fn instrument(&self) -> HedgeInstrument;

    /// Computes the floor for `volume` tonnes under `quote`.
    ///
    /// # Errors
    ///
    /// Returns a model-local [`DomainError`] when the floor cannot be
    /// computed from this quote.
    fn compute_floor(&self, quote: &MarketQuote, volume: VolumeTonnes)
    -> DomainResult<FloorQuote>;
}

/// Builds a floor from a raw model output, clamping negatives at zero.
pub(crate) fn clamp_floor(
    instrument: HedgeInstrument,
    raw: Decimal,
    volume: VolumeTonnes,
    components: FloorComponents,
) -> FloorQuote {
    match Price::new(raw) {
        Ok(price) => FloorQuote::available(instrument, price, volume, components),
        Err(_) => {
            tracing::debug!(%instrument, %raw, "floor clamped at zero");
            FloorQuote::degenerate(instrument, volume, components)
        }
    }
}

/// One model per instrument, held in canonical order.
#[derive(Debug, Clone)]
pub struct InstrumentModelSet {
    futures: Arc<dyn InstrumentModel>,
    put: Arc<dyn InstrumentModel>,
    forward: Arc<dyn InstrumentModel>,
}

impl InstrumentModelSet {
    /// Creates a model set from explicit models.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if a model is placed in the slot
    /// of a different instrument.
    pub fn new(
        futures: Arc<dyn InstrumentModel>,
        put: Arc<dyn InstrumentModel>,
        forward: Arc<dyn InstrumentModel>,
    ) -> DomainResult<Self> {
        for (expected, model) in HedgeInstrument::CANONICAL_ORDER
            .iter()
            .zip([&futures, &put, &forward])
        {
            if model.instrument() != *expected {
                return Err(DomainError::invalid_config(format!(
                    "{} model placed in the {expected} slot",
                    model.instrument()
                )));
            }
        }
        Ok(Self {
            futures,
            put,
            forward,
        })
    }

    /// Creates the standard Futures, Put and Forward models.
    #[must_use]
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            futures: Arc::new(FuturesFloorModel::new(config.margin_schedule.clone())),
            put: Arc::new(PutFloorModel::new(
                config.strike_increment,
                config.strike_band,
            )),
            forward: Arc::new(ForwardFloorModel::new(
                config.bulk_threshold_tonnes,
                config.bulk_discount_rate,
            )),
        }
    }

    /// Returns the model for an instrument.
    #[must_use]
    pub fn get(&self, instrument: HedgeInstrument) -> &Arc<dyn InstrumentModel> {
        match instrument {
            HedgeInstrument::Futures => &self.futures,
            HedgeInstrument::Put => &self.put,
            HedgeInstrument::Forward => &self.forward,
        }
    }

    /// Iterates the models in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn InstrumentModel>> {
        [&self.futures, &self.put, &self.forward].into_iter()
    }
}

impl Default for InstrumentModelSet {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}
