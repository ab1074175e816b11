//! # REST API
//!
//! HTTP endpoints using axum.
//!
//! # Endpoints
//!
//! ## Pricing
//! - `POST /price`, `POST /api/price` - Price a hedge (`{ "volumeTonnes", "commodity"? }`)
//! - `GET /price?volume=&commodity=` - Same, from query parameters
//! - `GET /price/detailed?volume=&commodity=` - Per-instrument breakdown and ranking
//!
//! ## Service
//! - `GET /health` - Health check
//! - `GET /` - Service description
//!
//! Failures are returned as `{ "kind", "message" }` where `kind` is the
//! stable error code.
//!
//! # Usage
//!
//! ```ignore
//! use hedgefarm_pricer::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let router = create_router(AppState::new(Arc::new(service)), None);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ErrorResponse, HealthResponse, PriceQuery, PriceRequest, PriceResponse,
    ServiceInfo,
};
pub use routes::create_router;
