use regex::Regex;
use std::sync::OnceLock;
use tracing::{error, info};
use crate::errors::AppError;
use crate::external::market_data::{ExternalCoinMarket, MarketDataProvider};
use crate::models::{ChartPoint, CoinList, CoinSummary};

pub const VS_CURRENCY: &str = "usd";
pub const DEFAULT_CHART_DAYS: u32 = 365;
pub const MAX_CHART_DAYS: u32 = 3650;

fn coin_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("coin id pattern is valid"))
}

/// CoinGecko ids are lowercase slugs such as `usd-coin`.
pub(crate) fn validate_coin_id(coin_id: &str) -> Result<(), AppError> {
    if coin_id.len() > 100 || !coin_id_pattern().is_match(coin_id) {
        return Err(AppError::Validation(format!("Invalid coin id: {:?}", coin_id)));
    }
    Ok(())
}

pub(crate) fn resolve_days(days: Option<u32>) -> Result<u32, AppError> {
    match days {
        None => Ok(DEFAULT_CHART_DAYS),
        Some(d) if (1..=MAX_CHART_DAYS).contains(&d) => Ok(d),
        Some(d) => Err(AppError::Validation(format!(
            "days must be between 1 and {}, got {}",
            MAX_CHART_DAYS, d
        ))),
    }
}

pub(crate) fn project(coin: ExternalCoinMarket) -> CoinSummary {
    CoinSummary {
        name: coin.name,
        current_price: coin.current_price,
        market_cap: coin.market_cap,
        price_change_percentage_24h: coin.price_change_percentage_24h,
        high_24h: coin.high_24h,
        low_24h: coin.low_24h,
        ath: coin.ath,
    }
}

pub async fn list_coins(provider: &dyn MarketDataProvider, coin_ids: &[String]) -> Result<CoinList, AppError> {
    let markets = provider.fetch_markets(coin_ids, VS_CURRENCY).await.map_err(|e| {
        error!("Failed to fetch coin markets: {}", e);
        AppError::from(e)
    })?;
    info!("Fetched {} coin markets", markets.len());

    Ok(CoinList {
        coins: markets.into_iter().map(project).collect(),
    })
}

pub async fn coin_graph(
    provider: &dyn MarketDataProvider,
    coin_id: &str,
    days: Option<u32>,
) -> Result<Vec<ChartPoint>, AppError> {
    validate_coin_id(coin_id)?;
    let days = resolve_days(days)?;

    let points = provider.fetch_market_chart(coin_id, VS_CURRENCY, days).await.map_err(|e| {
        error!("Failed to fetch market chart for {}: {}", coin_id, e);
        AppError::from(e)
    })?;
    info!("Fetched {} chart points for {} over {} days", points.len(), coin_id, days);
    Ok(points)
}
