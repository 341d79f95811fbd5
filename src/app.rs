use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{
    accounts, achievements, health, holdings, leaderboards, profiles, quests, trades, trading,
};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/accounts", accounts::router())
        .nest("/api/profiles", profiles::router())
        .nest("/api/trades", trades::router())
        .nest("/api/holdings", holdings::router())
        .nest("/api/quests", quests::router())
        .nest("/api/user-quests", quests::user_quest_router())
        .nest("/api/achievements", achievements::router())
        .nest("/api/leaderboards", leaderboards::router())
        .nest("/api/leaderboard-entries", leaderboards::entry_router())
        .merge(trading::router())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_data::{ExternalCoinMarket, MarketDataError, MarketDataProvider};
    use crate::models::ChartPoint;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct OfflineMarketData;

    #[async_trait]
    impl MarketDataProvider for OfflineMarketData {
        async fn fetch_markets(
            &self,
            _coin_ids: &[String],
            _vs_currency: &str,
        ) -> Result<Vec<ExternalCoinMarket>, MarketDataError> {
            Err(MarketDataError::Timeout)
        }

        async fn fetch_market_chart(
            &self,
            _coin_id: &str,
            _vs_currency: &str,
            _days: u32,
        ) -> Result<Vec<ChartPoint>, MarketDataError> {
            Err(MarketDataError::RateLimited)
        }
    }

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        create_app(AppState {
            pool,
            market_data: Arc::new(OfflineMarketData),
            tracked_coins: Arc::new(vec!["bitcoin".to_string()]),
        })
    }

    async fn send(uri: &str, method: &str) -> axum::response::Response {
        app()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn error_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = send("/health", "GET").await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_trading_routes_are_mounted_at_root() {
        assert_eq!(send("/trading/", "GET").await.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(send("/trading/bitcoin/", "GET").await.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        assert_eq!(send("/api/portfolios", "GET").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected_before_the_database() {
        let response = send("/api/trades/not-a-uuid", "GET").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"], "validation");
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_delete_and_user_quest_fetch_are_routed() {
        // A bad id reaches the handler's extractor, so the route exists.
        assert_eq!(send("/api/profiles/nope", "DELETE").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(send("/api/user-quests/nope", "GET").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_days_is_a_json_validation_error() {
        let response = send("/trading/bitcoin/?days=abc", "GET").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "validation");
    }

    #[tokio::test]
    async fn test_invalid_request_body_is_a_json_validation_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/accounts")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"username": 42}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"], "validation");

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/quests")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"], "validation");
        assert!(body["message"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_trades_have_no_delete_route() {
        let uri = format!("/api/trades/{}", uuid::Uuid::new_v4());
        assert_eq!(send(&uri, "DELETE").await.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/trading/")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
