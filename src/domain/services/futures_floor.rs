//! # Futures Floor Model
//!
//! Floor = futures price − margin cost per tonne for the volume.
//!
//! Larger positions tie up more margin capital, so the margin drag is a
//! non-decreasing step function of volume ([`MarginSchedule`]).

use crate::domain::entities::{FloorComponents, FloorQuote, MarketQuote};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::instrument_model::{InstrumentModel, clamp_floor};
use crate::domain::services::model_config::MarginSchedule;
use crate::domain::value_objects::{CheckedArithmetic, HedgeInstrument, VolumeTonnes};

/// Exchange-traded futures hedge.
#[derive(Debug, Clone, Default)]
pub struct FuturesFloorModel {
    schedule: MarginSchedule,
}

impl FuturesFloorModel {
    /// Creates a futures model with the given margin schedule.
    #[must_use]
    pub fn new(schedule: MarginSchedule) -> Self {
        Self { schedule }
    }

    /// Returns the margin schedule.
    #[inline]
    #[must_use]
    pub fn schedule(&self) -> &MarginSchedule {
        &self.schedule
    }
}

impl InstrumentModel for FuturesFloorModel {
    fn instrument(&self) -> HedgeInstrument {
        HedgeInstrument::Futures
    }

    fn compute_floor(
        &self,
        quote: &MarketQuote,
        volume: VolumeTonnes,
    ) -> DomainResult<FloorQuote> {
        let arithmetic = |e| DomainError::arithmetic(HedgeInstrument::Futures, e);

        let futures_price = quote.futures_price();
        let margin_cost_per_tonne = self.schedule.cost_per_tonne(volume.get());
        let total_margin_cost = margin_cost_per_tonne
            .safe_mul(volume.get())
            .map_err(arithmetic)?;
        let raw = futures_price
            .get()
            .safe_sub(margin_cost_per_tonne)
            .map_err(arithmetic)?;

        Ok(clamp_floor(
            HedgeInstrument::Futures,
            raw,
            volume,
            FloorComponents::Futures {
                futures_price,
                margin_cost_per_tonne,
                total_margin_cost,
            },
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::services::model_config::MarginStep;
    use crate::domain::value_objects::{Commodity, Price, Timestamp};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn quote(futures: i64) -> MarketQuote {
        MarketQuote::new(Commodity::wheat(), d(futures), vec![], d(0), Timestamp::now()).unwrap()
    }

    fn volume(t: i64) -> VolumeTonnes {
        VolumeTonnes::new(d(t)).unwrap()
    }

    #[test]
    fn deducts_margin_for_volume_step() {
        let model = FuturesFloorModel::default();
        let floor = model.compute_floor(&quote(15000), volume(1000)).unwrap();
        assert_eq!(floor.instrument(), HedgeInstrument::Futures);
        assert_eq!(floor.floor_price(), Some(Price::new(d(14800)).unwrap()));
        assert!(!floor.is_degenerate());
    }

    #[test]
    fn reports_margin_components() {
        let model = FuturesFloorModel::default();
        let floor = model.compute_floor(&quote(15000), volume(600)).unwrap();
        assert!(matches!(
            floor.components(),
            Some(FloorComponents::Futures {
                margin_cost_per_tonne,
                total_margin_cost,
                ..
            }) if *margin_cost_per_tonne == d(200) && *total_margin_cost == d(120_000)
        ));
    }

    #[test]
    fn clamps_at_zero_when_margin_exceeds_price() {
        let model = FuturesFloorModel::default();
        let floor = model.compute_floor(&quote(100), volume(50_000)).unwrap();
        assert!(floor.is_degenerate());
        assert_eq!(floor.floor_price(), Some(Price::ZERO));
        assert!(floor.warning().is_some());
    }

    #[test]
    fn custom_schedule_is_used() {
        let schedule = MarginSchedule::new(vec![
            MarginStep::new(d(0), d(10)),
            MarginStep::new(d(100), d(20)),
        ])
        .unwrap();
        let model = FuturesFloorModel::new(schedule);
        let floor = model.compute_floor(&quote(1000), volume(150)).unwrap();
        assert_eq!(floor.floor_price(), Some(Price::new(d(980)).unwrap()));
    }

    proptest! {
        #[test]
        fn floor_is_non_increasing_in_volume_and_non_negative(
            futures in 1i64..50_000,
            v1 in 1i64..100_000,
            v2 in 1i64..100_000,
        ) {
            let model = FuturesFloorModel::default();
            let q = quote(futures);
            let (small, large) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };
            let a = model.compute_floor(&q, volume(small)).unwrap().floor_price().unwrap();
            let b = model.compute_floor(&q, volume(large)).unwrap().floor_price().unwrap();
            prop_assert!(b <= a);
            prop_assert!(a.get() >= Decimal::ZERO);
            prop_assert!(b.get() >= Decimal::ZERO);
        }
    }
}
