//! # Domain Layer
//!
//! Value objects, entities and the pure instrument models. Nothing here
//! performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
