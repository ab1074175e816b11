//! # HedgeFarm Pricer
//!
//! Minimum guaranteed price floors for agricultural producers hedging a
//! harvest with futures, protective puts or forward contracts, and a
//! recommendation of which instrument gives the highest floor.
//!
//! # Architecture
//!
//! - [`domain`]: Value objects, entities and the three instrument models
//! - [`application`]: Floor calculator, recommendation engine, pricing façade
//! - [`infrastructure`]: Market data sources and audit sinks
//! - [`api`]: REST endpoints
//!
//! # Example
//!
//! ```
//! use hedgefarm_pricer::domain::entities::MarketQuote;
//! use hedgefarm_pricer::domain::services::{InstrumentModelSet, ModelConfig};
//! use hedgefarm_pricer::domain::value_objects::{Commodity, Timestamp, VolumeTonnes};
//! use hedgefarm_pricer::application::services::RecommendationEngine;
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
//! let volume = VolumeTonnes::from_f64(1000.0).unwrap();
//!
//! let models = InstrumentModelSet::from_config(&ModelConfig::default());
//! let floors: Vec<_> = models
//!     .iter()
//!     .map(|m| m.compute_floor(&quote, volume).unwrap())
//!     .collect();
//!
//! let recommended = RecommendationEngine::default().recommend(&floors).unwrap();
//! assert_eq!(recommended.to_string(), "forward");
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use application::error::{HedgeError, HedgeResult};
pub use application::services::PriceQuoteService;
pub use config::AppConfig;
pub use domain::value_objects::{Commodity, HedgeInstrument, Price, VolumeTonnes};
