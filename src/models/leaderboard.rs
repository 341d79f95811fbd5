use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardType {
    Daily,
    Weekly,
    Tournament,
}

// A time-bounded competition scored by profit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Leaderboard {
    pub id: Uuid,
    pub leaderboard_type: LeaderboardType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeaderboard {
    pub leaderboard_type: LeaderboardType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub leaderboard_id: Uuid,
    pub profile_id: Uuid,
    pub profit: BigDecimal,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitEntry {
    pub profile_id: Uuid,
    pub profit: BigDecimal,
}
