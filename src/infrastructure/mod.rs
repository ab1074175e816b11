//! # Infrastructure Layer
//!
//! Adapters for market data and audit forwarding.

pub mod audit;
pub mod market_data;
