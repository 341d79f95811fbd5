use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::routes::extract::{ApiPath, ApiQuery};
use crate::models::{ChartPoint, ChartQuery, CoinList};
use crate::services::market_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trading", get(list_coins))
        .route("/trading/", get(list_coins))
        .route("/trading/:coin_id", get(coin_graph))
        .route("/trading/:coin_id/", get(coin_graph))
}

pub async fn list_coins(State(state): State<AppState>) -> Result<Json<CoinList>, AppError> {
    info!("GET /trading/ - Listing {} tracked coins", state.tracked_coins.len());
    let coins = market_service::list_coins(state.market_data.as_ref(), &state.tracked_coins)
        .await
        .map_err(|e| {
            error!("Failed to list coins: {}", e);
            e
        })?;
    Ok(Json(coins))
}

pub async fn coin_graph(
    State(state): State<AppState>,
    ApiPath(coin_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ChartQuery>,
) -> Result<Json<Vec<ChartPoint>>, AppError> {
    info!("GET /trading/{}/ - Fetching price graph", coin_id);
    let points = market_service::coin_graph(state.market_data.as_ref(), &coin_id, query.days)
        .await
        .map_err(|e| {
            error!("Failed to fetch graph for {}: {}", coin_id, e);
            e
        })?;
    Ok(Json(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_data::{ExternalCoinMarket, MarketDataError, MarketDataProvider};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    enum Upstream {
        Healthy,
        Down,
        NoPrices,
    }

    struct FakeCoinGecko(Upstream);

    #[async_trait]
    impl MarketDataProvider for FakeCoinGecko {
        async fn fetch_markets(
            &self,
            coin_ids: &[String],
            _vs_currency: &str,
        ) -> Result<Vec<ExternalCoinMarket>, MarketDataError> {
            match self.0 {
                Upstream::Down => Err(MarketDataError::BadStatus(503)),
                _ => Ok(coin_ids
                    .iter()
                    .map(|id| {
                        serde_json::from_value(json!({
                            "id": id, "name": id.to_uppercase(), "current_price": 10.5, "market_cap": 1000,
                            "price_change_percentage_24h": 2.25, "high_24h": 11, "low_24h": 9.75, "ath": 20,
                            "image": "https://example.invalid/icon.png"
                        }))
                        .unwrap()
                    })
                    .collect()),
            }
        }

        async fn fetch_market_chart(
            &self,
            _coin_id: &str,
            _vs_currency: &str,
            _days: u32,
        ) -> Result<Vec<ChartPoint>, MarketDataError> {
            match self.0 {
                Upstream::Healthy => Ok(serde_json::from_value(json!([[1000, 1.5], [2000, 2.5], [1500, 0.5]])).unwrap()),
                Upstream::Down => Err(MarketDataError::BadStatus(500)),
                Upstream::NoPrices => Err(MarketDataError::MissingField("prices")),
            }
        }
    }

    fn app(upstream: Upstream) -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let state = AppState {
            pool,
            market_data: Arc::new(FakeCoinGecko(upstream)),
            tracked_coins: Arc::new(vec!["bitcoin".to_string(), "ethereum".to_string()]),
        };
        router().with_state(state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_coins_wraps_in_coins_key() {
        let (status, body) = get_json(app(Upstream::Healthy), "/trading/").await;

        assert_eq!(status, StatusCode::OK);
        let coins = body["coins"].as_array().unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0], json!({
            "name": "BITCOIN", "current_price": 10.5, "market_cap": 1000,
            "price_change_percentage_24h": 2.25, "high_24h": 11, "low_24h": 9.75, "ath": 20
        }));
        assert_eq!(coins[1]["name"], "ETHEREUM");
    }

    #[tokio::test]
    async fn test_list_coins_upstream_down_is_not_success_shaped() {
        let (status, body) = get_json(app(Upstream::Down), "/trading/").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "upstream_unavailable");
        assert!(body.get("coins").is_none());
    }

    #[tokio::test]
    async fn test_coin_graph_returns_pairs_in_upstream_order() {
        let (status, body) = get_json(app(Upstream::Healthy), "/trading/bitcoin/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([[1000, 1.5], [2000, 2.5], [1500, 0.5]]));
    }

    #[tokio::test]
    async fn test_coin_graph_without_trailing_slash() {
        let (status, _) = get_json(app(Upstream::Healthy), "/trading/ethereum").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_coin_graph_upstream_down() {
        let (status, body) = get_json(app(Upstream::Down), "/trading/bitcoin/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_coin_graph_missing_prices() {
        let (status, body) = get_json(app(Upstream::NoPrices), "/trading/bitcoin/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "upstream_malformed");
    }

    #[tokio::test]
    async fn test_coin_graph_invalid_days() {
        let (status, body) = get_json(app(Upstream::Healthy), "/trading/bitcoin/?days=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
    }
}
