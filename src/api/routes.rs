//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, metrics, opportunities, ready, status, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Dashboard endpoints
        .route("/api/v1/status", get(status))
        .route("/api/v1/opportunities", get(opportunities))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::arbitrage::Opportunity;

    fn opportunity(bookmaker_a: &str, margin: rust_decimal::Decimal) -> Opportunity {
        Opportunity {
            match_id: None,
            participants: vec!["X".to_string(), "Y".to_string()],
            bookmaker_a: bookmaker_a.to_string(),
            bookmaker_b: "Z".to_string(),
            price_a: dec!(2.10),
            price_b: dec!(2.20),
            profit_margin_percent: margin,
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(AppState::new("soccer_epl"));
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_when_not_ready() {
        let app = create_router(AppState::new("soccer_epl"));
        let (status, _) = get_json(app, "/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_after_a_cycle() {
        let state = AppState::new("soccer_epl");
        state.record_cycle(&[]).await;
        let (status, body) = get_json(create_router(state), "/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sport"], "soccer_epl");
    }

    #[tokio::test]
    async fn opportunities_endpoint_sorts_by_margin() {
        let state = AppState::new("soccer_epl");
        state
            .record_cycle(&[opportunity("low", dec!(1.25)), opportunity("high", dec!(4.50))])
            .await;

        let (status, body) = get_json(create_router(state), "/api/v1/opportunities").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["opportunities"][0]["bookmaker_a"], "high");
        assert_eq!(body["opportunities"][1]["bookmaker_a"], "low");
    }

    #[tokio::test]
    async fn status_endpoint_reports_counters() {
        let state = AppState::new("soccer_epl");
        state.record_cycle(&[opportunity("a", dec!(2.00))]).await;

        let (status, body) = get_json(create_router(state), "/api/v1/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["cycles"], 1);
        assert_eq!(body["current_opportunities"], 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let app = create_router(AppState::new("soccer_epl"));
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
