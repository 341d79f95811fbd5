use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{CreateTrade, Trade};

// `timestamp` is filled in by the database default.
pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    profile_id: Uuid,
    input: CreateTrade,
) -> Result<Trade, sqlx::Error> {
    sqlx::query_as::<_, Trade>(
        "INSERT INTO trades (id, profile_id, crypto_symbol, trade_type, quantity, price_per_unit, total_value, quest_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id, profile_id, crypto_symbol, trade_type, quantity, price_per_unit, total_value, timestamp, quest_id"
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(input.crypto_symbol)
    .bind(input.trade_type)
    .bind(input.quantity)
    .bind(input.price_per_unit)
    .bind(input.total_value)
    .bind(input.quest_id)
    .fetch_one(executor)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Trade>, sqlx::Error> {
    sqlx::query_as::<_, Trade>(
        "SELECT id, profile_id, crypto_symbol, trade_type, quantity, price_per_unit, total_value, timestamp, quest_id
         FROM trades
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_profile(pool: &PgPool, profile_id: Uuid) -> Result<Vec<Trade>, sqlx::Error> {
    sqlx::query_as::<_, Trade>(
        "SELECT id, profile_id, crypto_symbol, trade_type, quantity, price_per_unit, total_value, timestamp, quest_id
         FROM trades
         WHERE profile_id = $1
         ORDER BY timestamp DESC"
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_by_quest(pool: &PgPool, quest_id: Uuid) -> Result<Vec<Trade>, sqlx::Error> {
    sqlx::query_as::<_, Trade>(
        "SELECT id, profile_id, crypto_symbol, trade_type, quantity, price_per_unit, total_value, timestamp, quest_id
         FROM trades
         WHERE quest_id = $1
         ORDER BY timestamp DESC"
    )
    .bind(quest_id)
    .fetch_all(pool)
    .await
}
