//! # API Layer
//!
//! External interfaces to the pricer.

pub mod rest;
