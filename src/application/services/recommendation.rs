//! # Recommendation Engine
//!
//! Picks the instrument that guarantees the producer the highest floor.
//!
//! The selection rule lives in a [`FloorRankingStrategy`]; the engine asks it
//! for a ranking and recommends rank 1. The default
//! [`EpsilonTieBreakStrategy`] works as follows:
//!
//! 1. Only available floors compete (the sentinel never wins).
//! 2. Floors within `epsilon` of the best floor are tied.
//! 3. Ties go to Forward, then Futures, then Put, since forwards carry no
//!    margin-call liquidity risk.
//! 4. Remaining ties go to the instrument first in canonical order.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::application::services::recommendation::RecommendationEngine;
//!
//! let engine = RecommendationEngine::default();
//! assert_eq!(engine.strategy_name(), "EpsilonTieBreak");
//! ```

use crate::application::error::{HedgeError, HedgeResult};
use crate::domain::entities::{FloorQuote, FloorSet, FloorValue};
use crate::domain::value_objects::{HedgeInstrument, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Default tie epsilon in currency per tonne.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// An available floor with its ranking information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedFloor {
    /// Instrument ranked.
    pub instrument: HedgeInstrument,
    /// Floor price per tonne.
    pub floor: Price,
    /// The rank (1 = recommended).
    pub rank: usize,
    /// True if this floor is tied with the best floor within epsilon.
    pub tied_with_best: bool,
}

impl RankedFloor {
    /// Returns true if this is the recommended instrument.
    #[must_use]
    pub fn is_best(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for RankedFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}={}", self.rank, self.instrument, self.floor)
    }
}

/// Ranks computed floors, best first.
pub trait FloorRankingStrategy: Send + Sync + fmt::Debug {
    /// Ranks the available floors. Unavailable floors are left out.
    ///
    /// Must be deterministic: the same input always yields the same ranking.
    fn rank(&self, floors: &[FloorQuote]) -> Vec<RankedFloor>;

    /// Returns the name of this strategy.
    fn name(&self) -> &'static str;
}

/// Highest floor wins; near-ties resolved by instrument preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpsilonTieBreakStrategy {
    epsilon: Decimal,
}

impl EpsilonTieBreakStrategy {
    /// Creates the strategy with a tie epsilon.
    #[must_use]
    pub fn new(epsilon: Decimal) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// Returns the tie epsilon.
    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }
}

impl Default for EpsilonTieBreakStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

/// Orders tied candidates by instrument preference, then canonical position.
fn by_preference(a: HedgeInstrument, b: HedgeInstrument) -> Ordering {
    a.tie_break_preference()
        .cmp(&b.tie_break_preference())
        .then_with(|| a.canonical_index().cmp(&b.canonical_index()))
}

impl FloorRankingStrategy for EpsilonTieBreakStrategy {
    fn rank(&self, floors: &[FloorQuote]) -> Vec<RankedFloor> {
        let available: Vec<(HedgeInstrument, Price)> = floors
            .iter()
            .filter_map(|q| q.floor_price().map(|p| (q.instrument(), p)))
            .collect();

        let Some(best) = available.iter().map(|(_, p)| p.get()).max() else {
            return Vec::new();
        };
        let threshold = best.checked_sub(self.epsilon).unwrap_or(best);

        let mut scored: Vec<(HedgeInstrument, Price, bool)> = available
            .into_iter()
            .map(|(instrument, price)| (instrument, price, price.get() >= threshold))
            .collect();

        scored.sort_by(|a, b| match (a.2, b.2) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => by_preference(a.0, b.0),
            (false, false) => b.1.cmp(&a.1).then_with(|| by_preference(a.0, b.0)),
        });

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (instrument, floor, tied_with_best))| RankedFloor {
                instrument,
                floor,
                rank: i + 1,
                tied_with_best,
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "EpsilonTieBreak"
    }
}

/// Selects the recommended instrument from a set of floors.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    strategy: Arc<dyn FloorRankingStrategy>,
}

impl RecommendationEngine {
    /// Creates an engine using the epsilon tie-break strategy.
    #[must_use]
    pub fn new(epsilon: Decimal) -> Self {
        Self::with_strategy(Arc::new(EpsilonTieBreakStrategy::new(epsilon)))
    }

    /// Creates an engine with a custom ranking strategy.
    #[must_use]
    pub fn with_strategy(strategy: Arc<dyn FloorRankingStrategy>) -> Self {
        Self { strategy }
    }

    /// Returns the ranking strategy name.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Ranks the available floors, best first.
    #[must_use]
    pub fn rank(&self, floors: &[FloorQuote]) -> Vec<RankedFloor> {
        self.strategy.rank(floors)
    }

    /// Returns the recommended instrument.
    ///
    /// # Errors
    ///
    /// Returns `HedgeError::NoViableInstrument` if no floor is available.
    pub fn recommend(&self, floors: &[FloorQuote]) -> HedgeResult<HedgeInstrument> {
        self.rank(floors)
            .first()
            .map(|best| best.instrument)
            .ok_or_else(|| no_viable_instrument(floors))
    }

    /// Returns the recommended instrument for a floor set.
    ///
    /// # Errors
    ///
    /// Returns `HedgeError::NoViableInstrument` if no floor is available.
    pub fn recommend_set(&self, floors: &FloorSet) -> HedgeResult<HedgeInstrument> {
        self.recommend(&floors.to_vec())
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

/// Builds the error listing why each floor is missing.
pub(crate) fn no_viable_instrument(floors: &[FloorQuote]) -> HedgeError {
    let reasons = floors
        .iter()
        .filter_map(|q| match q.value() {
            FloorValue::Unavailable { reason } => Some(format!("{}: {}", q.instrument(), reason)),
            FloorValue::Available { .. } => None,
        })
        .collect();
    HedgeError::NoViableInstrument { reasons }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::FloorComponents;
    use crate::domain::value_objects::VolumeTonnes;
    use proptest::prelude::*;

    fn volume() -> VolumeTonnes {
        VolumeTonnes::new(Decimal::new(1000, 0)).unwrap()
    }

    fn components(instrument: HedgeInstrument) -> FloorComponents {
        let price = Price::new(Decimal::new(15000, 0)).unwrap();
        match instrument {
            HedgeInstrument::Futures => FloorComponents::Futures {
                futures_price: price,
                margin_cost_per_tonne: Decimal::ZERO,
                total_margin_cost: Decimal::ZERO,
            },
            HedgeInstrument::Put => FloorComponents::Put {
                target_strike: price.get(),
                strike: price,
                premium: Price::ZERO,
            },
            HedgeInstrument::Forward => FloorComponents::Forward {
                futures_price: price,
                basis: Decimal::ZERO,
                excess_volume_tonnes: Decimal::ZERO,
                bulk_discount_per_tonne: Decimal::ZERO,
            },
        }
    }

    fn floor(instrument: HedgeInstrument, value: Option<Decimal>) -> FloorQuote {
        match value {
            Some(v) => FloorQuote::available(
                instrument,
                Price::new(v).unwrap(),
                volume(),
                components(instrument),
            ),
            None => FloorQuote::unavailable(instrument, volume(), "no data"),
        }
    }

    fn floors(futures: Option<i64>, put: Option<i64>, forward: Option<i64>) -> Vec<FloorQuote> {
        vec![
            floor(HedgeInstrument::Futures, futures.map(|v| Decimal::new(v, 0))),
            floor(HedgeInstrument::Put, put.map(|v| Decimal::new(v, 0))),
            floor(HedgeInstrument::Forward, forward.map(|v| Decimal::new(v, 0))),
        ]
    }

    mod selection {
        use super::*;

        #[test]
        fn strictly_greatest_floor_wins() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(Some(14700), Some(14900), Some(14800)));
            assert_eq!(result.unwrap(), HedgeInstrument::Put);
        }

        #[test]
        fn exact_tie_prefers_forward() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(Some(14800), Some(14500), Some(14800)));
            assert_eq!(result.unwrap(), HedgeInstrument::Forward);
        }

        #[test]
        fn near_tie_within_epsilon_prefers_forward() {
            let engine = RecommendationEngine::new(Decimal::new(5, 0));
            let result = engine.recommend(&floors(Some(14803), Some(14500), Some(14800)));
            assert_eq!(result.unwrap(), HedgeInstrument::Forward);
        }

        #[test]
        fn difference_beyond_epsilon_is_not_a_tie() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(Some(14801), Some(14500), Some(14800)));
            assert_eq!(result.unwrap(), HedgeInstrument::Futures);
        }

        #[test]
        fn futures_beats_put_on_tie() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(Some(14800), Some(14800), None));
            assert_eq!(result.unwrap(), HedgeInstrument::Futures);
        }

        #[test]
        fn sentinel_never_wins() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(None, Some(14500), Some(14200)));
            assert_eq!(result.unwrap(), HedgeInstrument::Put);
        }

        #[test]
        fn degenerate_zero_still_competes() {
            let engine = RecommendationEngine::default();
            let mut set = floors(None, None, None);
            set[1] = FloorQuote::degenerate(
                HedgeInstrument::Put,
                volume(),
                components(HedgeInstrument::Put),
            );
            assert_eq!(engine.recommend(&set).unwrap(), HedgeInstrument::Put);
        }

        #[test]
        fn all_sentinels_fail() {
            let engine = RecommendationEngine::default();
            let result = engine.recommend(&floors(None, None, None));
            assert!(matches!(
                result,
                Err(HedgeError::NoViableInstrument { reasons }) if reasons.len() == 3
            ));
        }
    }

    mod ranking {
        use super::*;

        #[test]
        fn ranks_best_first_and_skips_sentinels() {
            let engine = RecommendationEngine::default();
            let ranked = engine.rank(&floors(Some(14700), None, Some(14900)));
            assert_eq!(ranked.len(), 2);
            assert_eq!(ranked[0].instrument, HedgeInstrument::Forward);
            assert!(ranked[0].is_best());
            assert!(ranked[0].tied_with_best);
            assert_eq!(ranked[1].instrument, HedgeInstrument::Futures);
            assert_eq!(ranked[1].rank, 2);
            assert!(!ranked[1].tied_with_best);
        }

        #[test]
        fn tied_candidates_precede_lower_floors() {
            let engine = RecommendationEngine::new(Decimal::new(10, 0));
            let ranked = engine.rank(&floors(Some(15005), Some(15000), Some(14000)));
            let order: Vec<_> = ranked.iter().map(|r| r.instrument).collect();
            assert_eq!(
                order,
                vec![
                    HedgeInstrument::Futures,
                    HedgeInstrument::Put,
                    HedgeInstrument::Forward
                ]
            );
        }

        #[test]
        fn recommend_set_matches_slice() {
            let engine = RecommendationEngine::default();
            let list = floors(Some(14800), Some(14500), Some(14800));
            let set = FloorSet::new(list[0].clone(), list[1].clone(), list[2].clone()).unwrap();
            assert_eq!(
                engine.recommend_set(&set).unwrap(),
                engine.recommend(&list).unwrap()
            );
        }
    }

    fn option_floor() -> impl Strategy<Value = Option<i64>> {
        prop_oneof![Just(None), (0i64..20_000).prop_map(Some)]
    }

    proptest! {
        #[test]
        fn recommendation_is_deterministic(
            f in option_floor(),
            p in option_floor(),
            w in option_floor(),
        ) {
            let engine = RecommendationEngine::default();
            let set = floors(f, p, w);
            prop_assert_eq!(engine.recommend(&set), engine.recommend(&set));
        }

        #[test]
        fn one_sentinel_picks_greater_of_the_others(
            sentinel in 0usize..3,
            a in 0i64..20_000,
            b in 0i64..20_000,
        ) {
            prop_assume!(a != b);
            let mut values = [Some(a), Some(b), Some(b)];
            values[sentinel] = None;
            let others: Vec<usize> = (0..3).filter(|i| *i != sentinel).collect();
            values[others[0]] = Some(a);
            values[others[1]] = Some(b);

            let engine = RecommendationEngine::default();
            let set = floors(values[0], values[1], values[2]);
            let expected = if a > b { others[0] } else { others[1] };
            prop_assert_eq!(
                engine.recommend(&set).unwrap(),
                HedgeInstrument::CANONICAL_ORDER[expected]
            );
        }
    }
}
