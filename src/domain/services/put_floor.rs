//! # Put Floor Model
//!
//! Floor = strike − premium of the protective put nearest the market.
//!
//! The futures price is rounded to the configured strike increment; the
//! listed strike closest to that target is used, as long as it lies within
//! the configured band. Ties prefer the higher strike. The floor does not
//! depend on the volume.

use crate::domain::entities::{FloorComponents, FloorQuote, MarketQuote, PutOption};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::instrument_model::{InstrumentModel, clamp_floor};
use crate::domain::services::model_config::{DEFAULT_STRIKE_BAND, DEFAULT_STRIKE_INCREMENT};
use crate::domain::value_objects::{
    CheckedArithmetic, HedgeInstrument, VolumeTonnes, round_to_increment,
};
use rust_decimal::Decimal;

/// Protective put hedge.
#[derive(Debug, Clone, Copy)]
pub struct PutFloorModel {
    strike_increment: Decimal,
    strike_band: Decimal,
}

impl PutFloorModel {
    /// Creates a put model.
    #[must_use]
    pub fn new(strike_increment: Decimal, strike_band: Decimal) -> Self {
        Self {
            strike_increment,
            strike_band,
        }
    }

    /// Selects the listed put nearest to `target` within the band.
    fn select_put<'a>(
        &self,
        schedule: &'a [PutOption],
        target: Decimal,
    ) -> DomainResult<Option<&'a PutOption>> {
        let mut best: Option<(Decimal, &PutOption)> = None;
        for option in schedule {
            let distance = option
                .strike()
                .get()
                .safe_sub(target)
                .map_err(|e| DomainError::arithmetic(HedgeInstrument::Put, e))?
                .abs();
            if distance > self.strike_band {
                continue;
            }
            let closer = match best {
                None => true,
                Some((best_distance, current)) => {
                    distance < best_distance
                        || (distance == best_distance && option.strike() > current.strike())
                }
            };
            if closer {
                best = Some((distance, option));
            }
        }
        Ok(best.map(|(_, option)| option))
    }
}

impl Default for PutFloorModel {
    fn default() -> Self {
        Self::new(DEFAULT_STRIKE_INCREMENT, DEFAULT_STRIKE_BAND)
    }
}

impl InstrumentModel for PutFloorModel {
    fn instrument(&self) -> HedgeInstrument {
        HedgeInstrument::Put
    }

    fn compute_floor(
        &self,
        quote: &MarketQuote,
        volume: VolumeTonnes,
    ) -> DomainResult<FloorQuote> {
        let arithmetic = |e| DomainError::arithmetic(HedgeInstrument::Put, e);

        if quote.put_schedule().is_empty() {
            return Err(DomainError::EmptyPutSchedule(quote.commodity().clone()));
        }

        let target_strike =
            round_to_increment(quote.futures_price().get(), self.strike_increment)
                .map_err(arithmetic)?;
        let option = self
            .select_put(quote.put_schedule(), target_strike)?
            .ok_or_else(|| DomainError::UnsupportedStrike {
                commodity: quote.commodity().clone(),
                target_strike,
                band: self.strike_band,
            })?;

        let raw = option
            .strike()
            .get()
            .safe_sub(option.premium().get())
            .map_err(arithmetic)?;

        Ok(clamp_floor(
            HedgeInstrument::Put,
            raw,
            volume,
            FloorComponents::Put {
                target_strike,
                strike: option.strike(),
                premium: option.premium(),
            },
        ))
    }
}
