//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Numeric Types
//!
//! - [`Price`]: Non-negative decimal price in currency per tonne
//! - [`VolumeTonnes`]: Strictly positive decimal volume
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//!
//! ## Identifiers and Enums
//!
//! - [`Commodity`]: Normalised commodity identifier
//! - [`HedgeInstrument`]: Futures, Put or Forward
//! - [`Timestamp`]: UTC point in time

pub mod arithmetic;
pub mod commodity;
pub mod enums;
pub mod price;
pub mod timestamp;
pub mod volume;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic, round_to_increment};
pub use commodity::{Commodity, CommodityError};
pub use enums::{HedgeInstrument, ParseEnumError};
pub use price::Price;
pub use timestamp::Timestamp;
pub use volume::VolumeTonnes;
