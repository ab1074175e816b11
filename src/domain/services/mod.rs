//! # Domain Services
//!
//! Floor price models for the three hedging instruments.
//!
//! ## Services
//!
//! - [`instrument_model::InstrumentModel`]: Pure quote + volume → floor port
//! - [`futures_floor::FuturesFloorModel`]: Futures price less margin drag
//! - [`put_floor::PutFloorModel`]: Strike less premium of the nearest put
//! - [`forward_floor::ForwardFloorModel`]: Futures plus basis less bulk discount
//! - [`model_config::ModelConfig`]: Parameters shared by the models

pub mod forward_floor;
pub mod futures_floor;
pub mod instrument_model;
pub mod model_config;
pub mod put_floor;

pub use forward_floor::ForwardFloorModel;
pub use futures_floor::FuturesFloorModel;
pub use instrument_model::{InstrumentModel, InstrumentModelSet};
pub use model_config::{MarginSchedule, MarginStep, ModelConfig};
pub use put_floor::PutFloorModel;
