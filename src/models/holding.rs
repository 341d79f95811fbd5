use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Aggregated position in one symbol for a profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioHolding {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub crypto_symbol: String,
    pub quantity: BigDecimal,
    pub average_buy_price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHolding {
    pub crypto_symbol: String,
    pub quantity: BigDecimal,
    pub average_buy_price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHolding {
    pub quantity: BigDecimal,
    pub average_buy_price: BigDecimal,
}
