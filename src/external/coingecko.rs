use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::external::market_data::{ExternalCoinMarket, MarketDataError, MarketDataProvider};
use crate::models::ChartPoint;

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cryptoedu-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, MarketDataError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        // Status is checked before the body is touched.
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("CoinGecko rate limited request to {}", url);
            return Err(MarketDataError::RateLimited);
        }
        if !status.is_success() {
            warn!("CoinGecko returned {} for {}", status, url);
            return Err(MarketDataError::BadStatus(status.as_u16()));
        }
        Ok(resp)
    }
}

fn map_transport_error(e: reqwest::Error) -> MarketDataError {
    if e.is_timeout() {
        MarketDataError::Timeout
    } else {
        MarketDataError::Network(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Option<Vec<ChartPoint>>,
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(
        &self,
        coin_ids: &[String],
        vs_currency: &str,
    ) -> Result<Vec<ExternalCoinMarket>, MarketDataError> {
        let url = format!("{}/coins/markets", self.base_url);
        let ids = coin_ids.join(",");
        debug!("Fetching CoinGecko markets for {}", ids);

        let resp = self
            .get(&url, &[("vs_currency", vs_currency), ("ids", ids.as_str())])
            .await?;

        resp.json::<Vec<ExternalCoinMarket>>()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<ChartPoint>, MarketDataError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = days.to_string();
        debug!("Fetching CoinGecko market chart for {} over {} days", coin_id, days);

        let resp = self
            .get(&url, &[("vs_currency", vs_currency), ("days", days.as_str())])
            .await?;

        let body: MarketChartResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        body.prices.ok_or(MarketDataError::MissingField("prices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    // Serves a canned CoinGecko lookalike on an ephemeral port.
    async fn spawn_upstream(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: String) -> CoinGeckoProvider {
        CoinGeckoProvider::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_markets_sends_ids_and_currency() {
        let router = Router::new().route(
            "/coins/markets",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("vs_currency").map(String::as_str), Some("usd"));
                assert_eq!(params.get("ids").map(String::as_str), Some("bitcoin,ethereum"));
                Json(json!([
                    {"id": "bitcoin", "name": "Bitcoin", "current_price": 67000.12, "market_cap": 1320000000000u64,
                     "price_change_percentage_24h": -1.25, "high_24h": 68000, "low_24h": 66000.5, "ath": 73738,
                     "symbol": "btc"},
                    {"id": "ethereum", "name": "Ethereum", "current_price": 3500.5, "market_cap": 420000000000u64,
                     "price_change_percentage_24h": null, "high_24h": 3600, "low_24h": 3400, "ath": 4878.26}
                ]))
            }),
        );
        let base = spawn_upstream(router).await;

        let coins = provider(base)
            .fetch_markets(&["bitcoin".to_string(), "ethereum".to_string()], "usd")
            .await
            .unwrap();

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].name, "Bitcoin");
        assert_eq!(coins[0].market_cap.as_ref().unwrap().as_u64(), Some(1320000000000));
        assert!(coins[1].price_change_percentage_24h.is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported_before_parsing() {
        let router = Router::new().route(
            "/coins/markets",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "not json").into_response() }),
        );
        let base = spawn_upstream(router).await;

        let err = provider(base)
            .fetch_markets(&["bitcoin".to_string()], "usd")
            .await
            .unwrap_err();

        assert!(matches!(err, MarketDataError::BadStatus(503)));
    }

    #[tokio::test]
    async fn test_too_many_requests_maps_to_rate_limited() {
        let router = Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { AxumStatus::TOO_MANY_REQUESTS }),
        );
        let base = spawn_upstream(router).await;

        let err = provider(base).fetch_market_chart("bitcoin", "usd", 365).await.unwrap_err();
        assert!(matches!(err, MarketDataError::RateLimited));
    }

    #[tokio::test]
    async fn test_market_chart_preserves_order() {
        let router = Router::new().route(
            "/coins/:id/market_chart",
            get(|Path(id): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(id, "bitcoin");
                assert_eq!(params.get("days").map(String::as_str), Some("365"));
                Json(json!({
                    "prices": [[1700000000000u64, 35000.5], [1699913600000u64, 34000.25], [1700086400000u64, 36000]],
                    "market_caps": [],
                    "total_volumes": []
                }))
            }),
        );
        let base = spawn_upstream(router).await;

        let points = provider(base).fetch_market_chart("bitcoin", "usd", 365).await.unwrap();

        let as_json: Value = serde_json::to_value(&points).unwrap();
        assert_eq!(
            as_json,
            json!([[1700000000000u64, 35000.5], [1699913600000u64, 34000.25], [1700086400000u64, 36000]])
        );
    }

    #[tokio::test]
    async fn test_missing_prices_is_an_explicit_error() {
        let router = Router::new().route(
            "/coins/:id/market_chart",
            get(|| async { Json(json!({"error": "coin not found"})) }),
        );
        let base = spawn_upstream(router).await;

        let err = provider(base).fetch_market_chart("nope", "usd", 365).await.unwrap_err();
        assert!(matches!(err, MarketDataError::MissingField("prices")));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        // Bind then drop so nothing is listening on the port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(format!("http://{}", addr))
            .fetch_markets(&["bitcoin".to_string()], "usd")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketDataError::Network(_)));
    }
}
