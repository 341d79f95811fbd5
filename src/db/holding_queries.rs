use bigdecimal::BigDecimal;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{CreateHolding, PortfolioHolding, UpdateHolding};

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    profile_id: Uuid,
    input: CreateHolding,
) -> Result<PortfolioHolding, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "INSERT INTO portfolio_holdings (id, profile_id, crypto_symbol, quantity, average_buy_price)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, profile_id, crypto_symbol, quantity, average_buy_price"
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(input.crypto_symbol)
    .bind(input.quantity)
    .bind(input.average_buy_price)
    .fetch_one(executor)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<PortfolioHolding>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "SELECT id, profile_id, crypto_symbol, quantity, average_buy_price
         FROM portfolio_holdings
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_profile(pool: &PgPool, profile_id: Uuid) -> Result<Vec<PortfolioHolding>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "SELECT id, profile_id, crypto_symbol, quantity, average_buy_price
         FROM portfolio_holdings
         WHERE profile_id = $1
         ORDER BY crypto_symbol"
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

// Nothing enforces one row per (profile_id, crypto_symbol); the first match wins.
pub async fn fetch_by_profile_and_symbol<'e, E: PgExecutor<'e>>(
    executor: E,
    profile_id: Uuid,
    crypto_symbol: &str,
) -> Result<Option<PortfolioHolding>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "SELECT id, profile_id, crypto_symbol, quantity, average_buy_price
         FROM portfolio_holdings
         WHERE profile_id = $1 AND crypto_symbol = $2
         ORDER BY ctid
         LIMIT 1"
    )
    .bind(profile_id)
    .bind(crypto_symbol)
    .fetch_optional(executor)
    .await
}

pub async fn update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    input: UpdateHolding,
) -> Result<Option<PortfolioHolding>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "UPDATE portfolio_holdings
         SET quantity = $2, average_buy_price = $3
         WHERE id = $1
         RETURNING id, profile_id, crypto_symbol, quantity, average_buy_price"
    )
    .bind(id)
    .bind(input.quantity)
    .bind(input.average_buy_price)
    .fetch_optional(executor)
    .await
}

pub async fn set_quantity<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    quantity: &BigDecimal,
) -> Result<PortfolioHolding, sqlx::Error> {
    sqlx::query_as::<_, PortfolioHolding>(
        "UPDATE portfolio_holdings
         SET quantity = $2
         WHERE id = $1
         RETURNING id, profile_id, crypto_symbol, quantity, average_buy_price"
    )
    .bind(id)
    .bind(quantity)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolio_holdings WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
