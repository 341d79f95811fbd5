use serde::{Deserialize, Serialize};
use serde_json::Number;

/// The seven fields clients get for each tracked coin.
///
/// Numbers are kept as `serde_json::Number` so values pass through exactly as
/// the upstream encoded them; `None` mirrors an upstream `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    pub name: String,
    pub current_price: Option<Number>,
    pub market_cap: Option<Number>,
    pub price_change_percentage_24h: Option<Number>,
    pub high_24h: Option<Number>,
    pub low_24h: Option<Number>,
    pub ath: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinList {
    pub coins: Vec<CoinSummary>,
}

/// One `[timestamp_ms, price]` sample of a market chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint(pub Number, pub Number);

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub days: Option<u32>,
}
