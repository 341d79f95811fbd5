use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;

use crate::models::ChartPoint;

/// One coin record from the upstream markets listing.
///
/// Only the fields we forward are modelled; serde ignores the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalCoinMarket {
    pub name: String,
    pub current_price: Option<Number>,
    pub market_cap: Option<Number>,
    pub price_change_percentage_24h: Option<Number>,
    pub high_24h: Option<Number>,
    pub low_24h: Option<Number>,
    pub ath: Option<Number>,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream returned HTTP {0}")]
    BadStatus(u16),

    #[error("rate limited")]
    RateLimited,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("upstream payload is missing `{0}`")]
    MissingField(&'static str),
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current market snapshot for `coin_ids`, priced in `vs_currency`.
    async fn fetch_markets(
        &self,
        coin_ids: &[String],
        vs_currency: &str,
    ) -> Result<Vec<ExternalCoinMarket>, MarketDataError>;

    /// `[timestamp_ms, price]` history for one coin over the trailing `days`.
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<ChartPoint>, MarketDataError>;
}
