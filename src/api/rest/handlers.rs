//! # REST Handlers
//!
//! Request/response DTOs and handlers for the pricing endpoints.
//!
//! The response field names (`floor_futures`, `floor_put`, `floor_forward`,
//! `recommended`) are fixed by the existing frontend. Unavailable floors are
//! `null` and explained in `warnings`. A blank `commodity` is treated as
//! absent and priced as wheat.

use crate::application::error::HedgeError;
use crate::application::services::{
    FetchContext, HedgeBreakdown, PriceQuoteService, VOLUME_FIELD,
};
use crate::domain::entities::hedge_request::DEFAULT_TERM_MONTHS;
use crate::domain::entities::{HedgeRecommendation, HedgeRequest};
use crate::domain::value_objects::{HedgeInstrument, Timestamp};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pricing façade.
    pub service: Arc<PriceQuoteService>,
    /// Server start time for uptime.
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state around a service.
    #[must_use]
    pub fn new(service: Arc<PriceQuoteService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Body of `POST /price`.
///
/// The volume is kept as raw JSON so a missing or mistyped value is reported
/// against `volumeTonnes` rather than the whole body. Numeric strings are
/// accepted for form-encoded frontends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceRequest {
    /// Volume in tonnes.
    #[serde(default, rename = "volumeTonnes", alias = "volume_t", alias = "volume")]
    pub volume_tonnes: Option<Value>,
    /// Commodity, defaults to wheat.
    #[serde(default, alias = "culture")]
    pub commodity: Option<String>,
    /// Hedge term in months, defaults to 6.
    #[serde(default, rename = "term_m", alias = "term_months")]
    pub term_months: Option<i64>,
}

impl PriceRequest {
    fn volume(&self) -> Result<f64, ApiError> {
        let volume = match &self.volume_tonnes {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => Some(s.trim().parse::<f64>().map_err(|_| {
                HedgeError::invalid_request(VOLUME_FIELD, format!("'{s}' is not a number"))
            })?),
            Some(other) => {
                return Err(HedgeError::invalid_request(
                    VOLUME_FIELD,
                    format!("expected a number, got {other}"),
                )
                .into());
            }
        };
        required_volume(volume)
    }
}

/// Query of `GET /price` and `GET /price/detailed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceQuery {
    /// Volume in tonnes.
    #[serde(default, alias = "volumeTonnes", alias = "volume_t")]
    pub volume: Option<f64>,
    /// Commodity, defaults to wheat.
    #[serde(default, alias = "culture")]
    pub commodity: Option<String>,
    /// Hedge term in months, defaults to 6.
    #[serde(default, rename = "term_m", alias = "term_months")]
    pub term_months: Option<i64>,
}

impl PriceQuery {
    fn to_request(&self) -> Result<HedgeRequest, ApiError> {
        Ok(hedge_request(
            required_volume(self.volume)?,
            self.commodity.clone(),
            self.term_months,
        ))
    }
}

fn required_volume(volume: Option<f64>) -> Result<f64, ApiError> {
    volume.ok_or_else(|| HedgeError::invalid_request(VOLUME_FIELD, "is required").into())
}

fn hedge_request(volume: f64, commodity: Option<String>, term_months: Option<i64>) -> HedgeRequest {
    let request = match commodity.filter(|c| !c.trim().is_empty()) {
        Some(commodity) => HedgeRequest::new(commodity, volume),
        None => HedgeRequest::wheat(volume),
    };
    request.with_term_months(term_months)
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Consumer contract response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    /// Futures floor per tonne.
    pub floor_futures: Option<f64>,
    /// Put floor per tonne.
    pub floor_put: Option<f64>,
    /// Forward floor per tonne.
    pub floor_forward: Option<f64>,
    /// Recommended instrument.
    pub recommended: HedgeInstrument,
    /// One entry per degenerate or unavailable floor.
    pub warnings: Vec<String>,
    /// Commodity priced.
    pub commodity: String,
    /// Volume priced in tonnes.
    pub volume_t: f64,
    /// Hedge term in months.
    #[serde(default = "default_term")]
    pub term_m: u8,
    /// When the quote was observed.
    pub quoted_at: Timestamp,
    /// When the recommendation was calculated.
    pub calculated_at: Timestamp,
}

fn default_term() -> u8 {
    DEFAULT_TERM_MONTHS
}

impl From<&HedgeRecommendation> for PriceResponse {
    fn from(rec: &HedgeRecommendation) -> Self {
        let floor = |instrument| {
            rec.floor(instrument)
                .floor_price()
                .map(|price| price.to_f64())
        };
        Self {
            floor_futures: floor(HedgeInstrument::Futures),
            floor_put: floor(HedgeInstrument::Put),
            floor_forward: floor(HedgeInstrument::Forward),
            recommended: rec.recommended(),
            warnings: rec.warnings(),
            commodity: rec.commodity().to_string(),
            volume_t: rec.volume().to_f64(),
            term_m: rec.term_months(),
            quoted_at: rec.quoted_at(),
            calculated_at: rec.calculated_at(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since start.
    pub uptime_secs: u64,
    /// Why the market data source check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Root endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// Available endpoints.
    pub endpoints: Vec<String>,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

// ============================================================================
// Errors
// ============================================================================

/// A [`HedgeError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(HedgeError);

impl ApiError {
    /// Returns the HTTP status for the error kind.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0 {
            HedgeError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            HedgeError::QuoteUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HedgeError::NoViableInstrument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HedgeError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            HedgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HedgeError> for ApiError {
    fn from(error: HedgeError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(HedgeError::invalid_request("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(HedgeError::invalid_request("query", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            kind: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /`
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "hedgefarm-pricer".to_string(),
        version: crate::VERSION.to_string(),
        endpoints: [
            "GET /health",
            "GET /price?volume=&commodity=&term_m=",
            "POST /price",
            "POST /api/price",
            "GET /price/detailed?volume=&commodity=&term_m=",
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    })
}

/// `GET /health`
///
/// Reads one quote through the market data source; 503 if that fails.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, error) = match state.service.calculator().check_source().await {
        Ok(_) => (StatusCode::OK, None),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Some(e.to_string()))
        }
    };
    let body = HealthResponse {
        status: if error.is_none() { "healthy" } else { "unhealthy" }.to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        error,
    };
    (status, Json(body))
}

/// `POST /price`, `POST /api/price`
pub async fn post_price(
    State(state): State<AppState>,
    body: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceResponse>, ApiError> {
    let Json(body) = body?;
    let request = hedge_request(body.volume()?, body.commodity, body.term_months);
    price(&state, &request).await
}

/// `GET /price`
pub async fn get_price(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceResponse>, ApiError> {
    let Query(query) = query?;
    price(&state, &query.to_request()?).await
}

/// `GET /price/detailed`
pub async fn get_price_detailed(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<HedgeBreakdown>, ApiError> {
    let Query(query) = query?;
    let breakdown = state
        .service
        .breakdown(&query.to_request()?, &FetchContext::new())
        .await?;
    Ok(Json(breakdown))
}

async fn price(state: &AppState, request: &HedgeRequest) -> Result<Json<PriceResponse>, ApiError> {
    let recommendation = state.service.price(request, &FetchContext::new()).await?;
    Ok(Json(PriceResponse::from(&recommendation)))
}
