use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    Buy,
    Sell,
}

// An executed buy or sell. Rows are never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trade {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub crypto_symbol: String,
    pub trade_type: TradeType,
    pub quantity: BigDecimal,
    pub price_per_unit: BigDecimal,
    pub total_value: BigDecimal,
    pub timestamp: DateTime<Utc>,
    pub quest_id: Option<Uuid>,
}

/// Records a trade as-is; `total_value` is stored exactly as supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrade {
    pub crypto_symbol: String,
    pub trade_type: TradeType,
    pub quantity: BigDecimal,
    pub price_per_unit: BigDecimal,
    pub total_value: BigDecimal,
    pub quest_id: Option<Uuid>,
}

/// A paper trade against the profile's balance and holdings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTrade {
    pub crypto_symbol: String,
    pub trade_type: TradeType,
    pub quantity: BigDecimal,
    pub price_per_unit: BigDecimal,
    pub quest_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TradeExecution {
    pub trade: Trade,
    pub virtual_funds: BigDecimal,
    pub realized_profit: BigDecimal,
    pub holding: Option<super::PortfolioHolding>,
}
