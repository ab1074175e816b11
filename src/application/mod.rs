//! # Application Layer
//!
//! Use cases on top of the domain: request validation, floor calculation,
//! recommendation and the pricing façade.

pub mod error;
pub mod services;

pub use error::{HedgeError, HedgeResult};
