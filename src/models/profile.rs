use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Starting paper-trading balance for every new profile.
pub const STARTING_FUNDS: i64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub virtual_funds: BigDecimal,
    pub level: i32,
    pub streak_count: i32,
    pub profile_icon: Option<String>,
    pub total_trades: i32,
    pub net_profit: BigDecimal,
    pub last_login_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub level: i32,
    pub streak_count: i32,
    pub profile_icon: Option<String>,
}

impl Profile {
    pub fn new(account_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            virtual_funds: BigDecimal::from(STARTING_FUNDS),
            level: 1,
            streak_count: 0,
            profile_icon: None,
            total_trades: 0,
            net_profit: BigDecimal::from(0),
            last_login_date: None,
        }
    }
}
