//! # Instrument Model Configuration
//!
//! Parameters of the floor cost model, passed to the models at construction.
//!
//! - [`MarginSchedule`]: Step function of exchange margin cost by volume
//! - [`ModelConfig`]: Margin schedule, strike increment and band, bulk discount
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::domain::services::model_config::ModelConfig;
//! use rust_decimal::Decimal;
//!
//! let config = ModelConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.strike_increment, Decimal::new(100, 0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default put strike increment (currency per tonne).
pub const DEFAULT_STRIKE_INCREMENT: Decimal = Decimal::ONE_HUNDRED;

/// Default maximum distance between the target strike and a usable strike.
pub const DEFAULT_STRIKE_BAND: Decimal = Decimal::ONE_THOUSAND;

/// Default bulk threshold above which forward counterparties discount (tonnes).
pub const DEFAULT_BULK_THRESHOLD_TONNES: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Default forward bulk discount: 0.02 currency per tonne per excess tonne.
pub const DEFAULT_BULK_DISCOUNT_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// One step of the margin cost schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginStep {
    /// Smallest volume (inclusive) this step applies to.
    pub min_volume_tonnes: Decimal,
    /// Margin and financing drag deducted from the futures price, per tonne.
    pub cost_per_tonne: Decimal,
}

impl MarginStep {
    /// Creates a margin step.
    #[must_use]
    pub const fn new(min_volume_tonnes: Decimal, cost_per_tonne: Decimal) -> Self {
        Self {
            min_volume_tonnes,
            cost_per_tonne,
        }
    }
}

/// Monotonically non-decreasing step function of margin cost by volume.
///
/// # Invariants
///
/// - At least one step, and the first step starts at zero tonnes
/// - Step thresholds strictly increase
/// - Costs are non-negative and never decrease from one step to the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MarginStep>", into = "Vec<MarginStep>")]
pub struct MarginSchedule {
    steps: Vec<MarginStep>,
}

impl MarginSchedule {
    /// Creates a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if any invariant is violated.
    pub fn new(steps: Vec<MarginStep>) -> DomainResult<Self> {
        let first = steps
            .first()
            .ok_or_else(|| DomainError::invalid_config("margin schedule must not be empty"))?;
        if !first.min_volume_tonnes.is_zero() {
            return Err(DomainError::invalid_config(
                "first margin step must start at 0 tonnes",
            ));
        }
        if steps.iter().any(|s| s.cost_per_tonne.is_sign_negative()) {
            return Err(DomainError::invalid_config(
                "margin cost per tonne must not be negative",
            ));
        }
        for pair in steps.windows(2) {
            if let [lower, upper] = pair {
                if upper.min_volume_tonnes <= lower.min_volume_tonnes {
                    return Err(DomainError::invalid_config(
                        "margin step thresholds must strictly increase",
                    ));
                }
                if upper.cost_per_tonne < lower.cost_per_tonne {
                    return Err(DomainError::invalid_config(
                        "margin cost must not decrease with volume",
                    ));
                }
            }
        }
        Ok(Self { steps })
    }

    /// Returns the margin cost per tonne for a volume.
    #[must_use]
    pub fn cost_per_tonne(&self, volume_tonnes: Decimal) -> Decimal {
        self.steps
            .iter()
            .take_while(|s| s.min_volume_tonnes <= volume_tonnes)
            .last()
            .map_or(Decimal::ZERO, |s| s.cost_per_tonne)
    }

    /// Returns the steps.
    #[must_use]
    pub fn steps(&self) -> &[MarginStep] {
        &self.steps
    }
}

impl Default for MarginSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                MarginStep::new(Decimal::ZERO, Decimal::new(150, 0)),
                MarginStep::new(Decimal::new(500, 0), Decimal::new(200, 0)),
                MarginStep::new(Decimal::new(2000, 0), Decimal::new(300, 0)),
                MarginStep::new(Decimal::new(10000, 0), Decimal::new(450, 0)),
            ],
        }
    }
}

impl TryFrom<Vec<MarginStep>> for MarginSchedule {
    type Error = DomainError;

    fn try_from(steps: Vec<MarginStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<MarginSchedule> for Vec<MarginStep> {
    fn from(schedule: MarginSchedule) -> Self {
        schedule.steps
    }
}

/// Parameters shared by the three instrument models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Margin cost schedule for the futures model.
    pub margin_schedule: MarginSchedule,
    /// Increment the futures price is rounded to when picking a put strike.
    pub strike_increment: Decimal,
    /// Maximum distance from the rounded futures price to a usable strike.
    pub strike_band: Decimal,
    /// Volume above which forward counterparties apply a bulk discount.
    pub bulk_threshold_tonnes: Decimal,
    /// Discount per tonne of forward price for every tonne above the threshold.
    pub bulk_discount_rate: Decimal,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            margin_schedule: MarginSchedule::default(),
            strike_increment: DEFAULT_STRIKE_INCREMENT,
            strike_band: DEFAULT_STRIKE_BAND,
            bulk_threshold_tonnes: DEFAULT_BULK_THRESHOLD_TONNES,
            bulk_discount_rate: DEFAULT_BULK_DISCOUNT_RATE,
        }
    }
}

impl ModelConfig {
    /// Sets the margin schedule.
    #[must_use]
    pub fn with_margin_schedule(mut self, schedule: MarginSchedule) -> Self {
        self.margin_schedule = schedule;
        self
    }

    /// Sets the strike increment and band.
    #[must_use]
    pub fn with_strikes(mut self, increment: Decimal, band: Decimal) -> Self {
        self.strike_increment = increment;
        self.strike_band = band;
        self
    }

    /// Sets the forward bulk threshold and discount rate.
    #[must_use]
    pub fn with_bulk_discount(mut self, threshold_tonnes: Decimal, rate: Decimal) -> Self {
        self.bulk_threshold_tonnes = threshold_tonnes;
        self.bulk_discount_rate = rate;
        self
    }

    /// Validates the scalar parameters.
    ///
    /// The margin schedule validates itself on construction.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` naming the offending parameter.
    pub fn validate(&self) -> DomainResult<()> {
        if self.strike_increment <= Decimal::ZERO {
            return Err(DomainError::invalid_config(
                "strike_increment must be positive",
            ));
        }
        if self.strike_band.is_sign_negative() {
            return Err(DomainError::invalid_config(
                "strike_band must not be negative",
            ));
        }
        if self.bulk_threshold_tonnes.is_sign_negative() {
            return Err(DomainError::invalid_config(
                "bulk_threshold_tonnes must not be negative",
            ));
        }
        if self.bulk_discount_rate.is_sign_negative() {
            return Err(DomainError::invalid_config(
                "bulk_discount_rate must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn default_schedule_is_valid() {
        let steps = MarginSchedule::default().steps().to_vec();
        assert!(MarginSchedule::new(steps).is_ok());
    }

    #[test]
    fn cost_per_tonne_picks_highest_reached_step() {
        let schedule = MarginSchedule::default();
        assert_eq!(schedule.cost_per_tonne(d(1)), d(150));
        assert_eq!(schedule.cost_per_tonne(d(499)), d(150));
        assert_eq!(schedule.cost_per_tonne(d(500)), d(200));
        assert_eq!(schedule.cost_per_tonne(d(1000)), d(200));
        assert_eq!(schedule.cost_per_tonne(d(2000)), d(300));
        assert_eq!(schedule.cost_per_tonne(d(50000)), d(450));
    }

    #[test]
    fn rejects_empty_schedule() {
        assert!(MarginSchedule::new(vec![]).is_err());
    }

    #[test]
    fn rejects_schedule_not_starting_at_zero() {
        let steps = vec![MarginStep::new(d(10), d(100))];
        assert!(MarginSchedule::new(steps).is_err());
    }

    #[test]
    fn rejects_decreasing_cost() {
        let steps = vec![
            MarginStep::new(d(0), d(200)),
            MarginStep::new(d(1000), d(100)),
        ];
        assert!(MarginSchedule::new(steps).is_err());
    }

    #[test]
    fn rejects_unsorted_thresholds() {
        let steps = vec![
            MarginStep::new(d(0), d(100)),
            MarginStep::new(d(1000), d(200)),
            MarginStep::new(d(1000), d(300)),
        ];
        assert!(MarginSchedule::new(steps).is_err());
    }

    #[test]
    fn rejects_negative_cost() {
        let steps = vec![MarginStep::new(d(0), d(-1))];
        assert!(MarginSchedule::new(steps).is_err());
    }

    #[test]
    fn schedule_deserialises_with_validation() {
        let ok: Result<MarginSchedule, _> = serde_json::from_str(
            r#"[{"min_volume_tonnes": 0, "cost_per_tonne": 100},
                {"min_volume_tonnes": 1000, "cost_per_tonne": 250}]"#,
        );
        assert_eq!(ok.unwrap().cost_per_tonne(d(1500)), d(250));

        let bad: Result<MarginSchedule, _> = serde_json::from_str(
            r#"[{"min_volume_tonnes": 0, "cost_per_tonne": 300},
                {"min_volume_tonnes": 1000, "cost_per_tonne": 250}]"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.strike_increment, d(100));
        assert_eq!(config.strike_band, d(1000));
        assert_eq!(config.bulk_threshold_tonnes, d(5000));
        assert_eq!(config.bulk_discount_rate, Decimal::new(2, 2));
    }

    #[test]
    fn model_config_validation() {
        assert!(
            ModelConfig::default()
                .with_strikes(Decimal::ZERO, d(100))
                .validate()
                .is_err()
        );
        assert!(
            ModelConfig::default()
                .with_strikes(d(50), d(-1))
                .validate()
                .is_err()
        );
        assert!(
            ModelConfig::default()
                .with_bulk_discount(d(5000), Decimal::new(-1, 2))
                .validate()
                .is_err()
        );
    }
}
