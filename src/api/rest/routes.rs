//! # REST Routes
//!
//! Router construction with CORS and request tracing.

use crate::api::rest::handlers::{
    AppState, get_price, get_price_detailed, health, post_price, service_info,
};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the router.
///
/// `cors_origin` restricts CORS to one frontend origin; `None` or an
/// unparsable origin allows any.
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/price", get(get_price).post(post_price))
        .route("/api/price", post(post_price))
        .route("/price/detailed", get(get_price_detailed))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid CORS origin, allowing any");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::{ErrorResponse, HealthResponse, PriceResponse};
    use crate::application::services::{
        CalculatorConfig, FloorPriceCalculator, PriceQuoteService, RecommendationEngine,
    };
    use crate::domain::entities::{FloorQuote, MarketQuote, PutOption};
    use crate::domain::errors::{DomainError, DomainResult};
    use crate::domain::services::{InstrumentModel, InstrumentModelSet, ModelConfig};
    use crate::domain::value_objects::{
        ArithmeticError, Commodity, HedgeInstrument, Timestamp, VolumeTonnes,
    };
    use crate::infrastructure::market_data::{MarketQuoteSource, StaticQuoteSource};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn router_with(source: Arc<dyn MarketQuoteSource>) -> Router {
        let calculator = FloorPriceCalculator::from_model_config(
            source,
            &ModelConfig::default(),
            CalculatorConfig::default(),
        );
        let service = PriceQuoteService::new(calculator, RecommendationEngine::default());
        create_router(AppState::new(Arc::new(service)), None)
    }

    fn scenario_source() -> Arc<StaticQuoteSource> {
        let quote = MarketQuote::single_put(
            Commodity::wheat(),
            d(15000),
            d(300),
            d(14800),
            d(-200),
            Timestamp::now(),
        )
        .unwrap();
        Arc::new(StaticQuoteSource::with_quotes([quote]))
    }

    fn scenario_router() -> Router {
        router_with(scenario_source())
    }

    #[derive(Debug)]
    struct OverflowingModel(HedgeInstrument);

    impl InstrumentModel for OverflowingModel {
        fn instrument(&self) -> HedgeInstrument {
            self.0
        }

        fn compute_floor(
            &self,
            _quote: &MarketQuote,
            _volume: VolumeTonnes,
        ) -> DomainResult<FloorQuote> {
            Err(DomainError::arithmetic(self.0, ArithmeticError::Overflow))
        }
    }

    fn overflowing_router() -> Router {
        let models = InstrumentModelSet::new(
            Arc::new(OverflowingModel(HedgeInstrument::Futures)),
            Arc::new(OverflowingModel(HedgeInstrument::Put)),
            Arc::new(OverflowingModel(HedgeInstrument::Forward)),
        )
        .unwrap();
        let calculator =
            FloorPriceCalculator::new(scenario_source(), models, CalculatorConfig::default());
        let service = PriceQuoteService::new(calculator, RecommendationEngine::default());
        create_router(AppState::new(Arc::new(service)), None)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = scenario_router().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthResponse = json(response).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, crate::VERSION);
        assert!(body.error.is_none());
    }

    #[tokio::test]
    async fn health_is_unavailable_without_market_data() {
        let response = router_with(Arc::new(StaticQuoteSource::new()))
            .oneshot(get_req("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: HealthResponse = json(response).await;
        assert_eq!(body.status, "unhealthy");
        assert!(body.error.unwrap().contains("wheat"));
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let response = scenario_router().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json(response).await;
        assert_eq!(body["service"], "hedgefarm-pricer");
    }

    #[tokio::test]
    async fn post_price_follows_consumer_contract() {
        let response = scenario_router()
            .oneshot(post_json(
                "/price",
                r#"{"volumeTonnes": 1000, "commodity": "wheat"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["floor_futures"], 14800.0);
        assert_eq!(body["floor_put"], 14500.0);
        assert_eq!(body["floor_forward"], 14800.0);
        assert_eq!(body["recommended"], "forward");
        assert_eq!(body["volume_t"], 1000.0);
        assert_eq!(body["term_m"], 6);
        assert!(body["warnings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn term_is_echoed() {
        let response = scenario_router()
            .oneshot(post_json("/api/price", r#"{"volume_t": 1000, "term_m": 3}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PriceResponse = json(response).await;
        assert_eq!(body.term_m, 3);

        let response = scenario_router()
            .oneshot(get_req("/price?volume=1000&term_months=12"))
            .await
            .unwrap();
        let body: PriceResponse = json(response).await;
        assert_eq!(body.term_m, 12);
    }

    #[tokio::test]
    async fn out_of_range_term_is_bad_request() {
        for body in [
            r#"{"volume_t": 1000, "term_m": 99}"#,
            r#"{"volume_t": 1000, "term_m": 0}"#,
        ] {
            let response = scenario_router()
                .oneshot(post_json("/price", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: ErrorResponse = json(response).await;
            assert_eq!(body.kind, "invalid_request");
            assert!(body.message.contains("term_m"));
        }

        let response = scenario_router()
            .oneshot(get_req("/price/detailed?volume=1000&term_m=24"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_price_accepts_legacy_volume_alias() {
        let response = scenario_router()
            .oneshot(post_json("/api/price", r#"{"volume_t": 1000}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PriceResponse = json(response).await;
        assert_eq!(body.commodity, "wheat");
        assert_eq!(body.recommended, HedgeInstrument::Forward);
    }

    #[tokio::test]
    async fn get_price_reads_query() {
        let response = scenario_router()
            .oneshot(get_req("/price?volume=1000&culture=wheat"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PriceResponse = json(response).await;
        assert_eq!(body.floor_put, Some(14500.0));
    }

    #[tokio::test]
    async fn zero_volume_is_bad_request() {
        let response = scenario_router()
            .oneshot(post_json("/price", r#"{"volumeTonnes": 0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.kind, "invalid_request");
        assert!(body.message.contains("volumeTonnes"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = scenario_router()
            .oneshot(post_json("/price", r#"{"volumeTonnes": "#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.kind, "invalid_request");
    }

    #[tokio::test]
    async fn missing_or_mistyped_body_volume_names_field() {
        for body in [
            r#"{"commodity": "wheat"}"#,
            r#"{"volumeTonnes": true}"#,
            r#"{"volumeTonnes": "lots"}"#,
        ] {
            let response = scenario_router()
                .oneshot(post_json("/price", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: ErrorResponse = json(response).await;
            assert_eq!(body.kind, "invalid_request");
            assert!(body.message.starts_with("invalid volumeTonnes"));
        }
    }

    #[tokio::test]
    async fn numeric_string_volume_is_accepted() {
        let response = scenario_router()
            .oneshot(post_json("/price", r#"{"volume": "1000"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_commodity_defaults_to_wheat() {
        let response = scenario_router()
            .oneshot(get_req("/price?volume=1000&commodity="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PriceResponse = json(response).await;
        assert_eq!(body.commodity, "wheat");

        let response = scenario_router()
            .oneshot(post_json("/price", r#"{"volumeTonnes": 1000, "culture": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn no_viable_instrument_is_unprocessable() {
        let response = overflowing_router()
            .oneshot(get_req("/price?volume=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.kind, "no_viable_instrument");
    }

    #[tokio::test]
    async fn missing_query_volume_is_bad_request() {
        let response = scenario_router()
            .oneshot(get_req("/price?commodity=wheat"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert!(body.message.contains("volumeTonnes"));
    }

    #[tokio::test]
    async fn unsupported_commodity_is_bad_request() {
        let response = scenario_router()
            .oneshot(get_req("/price?volume=10&commodity=corn"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_quote_is_service_unavailable() {
        let response = router_with(Arc::new(StaticQuoteSource::new()))
            .oneshot(get_req("/price?volume=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.kind, "quote_unavailable");
    }

    #[tokio::test]
    async fn missing_put_data_is_null_with_warning() {
        let quote = MarketQuote::new(
            Commodity::wheat(),
            d(15000),
            vec![PutOption::new(d(5000), d(10)).unwrap()],
            d(-200),
            Timestamp::now(),
        )
        .unwrap();
        let response = router_with(Arc::new(StaticQuoteSource::with_quotes([quote])))
            .oneshot(get_req("/price?volume=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PriceResponse = json(response).await;
        assert_eq!(body.floor_put, None);
        assert_eq!(body.warnings.len(), 1);
        assert!(body.floor_futures.is_some());
    }

    #[tokio::test]
    async fn detailed_includes_breakdown() {
        let response = scenario_router()
            .oneshot(get_req("/price/detailed?volume=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json(response).await;
        assert_eq!(body["instruments"].as_array().unwrap().len(), 3);
        assert_eq!(body["ranking"][0]["instrument"], "forward");
        assert_eq!(body["strategy"], "EpsilonTieBreak");
    }

    #[test]
    fn invalid_cors_origin_falls_back() {
        let _ = cors_layer(Some("not a header\n"));
        let _ = cors_layer(Some("http://localhost:3000"));
    }
}
