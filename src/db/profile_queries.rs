use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Profile, UpdateProfile};

const PROFILE_COLUMNS: &str = "id, account_id, virtual_funds, level, streak_count, profile_icon, \
                               total_trades, net_profit, last_login_date";

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, input: &Profile) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "INSERT INTO profiles (id, account_id, virtual_funds, level, streak_count, profile_icon,
                               total_trades, net_profit, last_login_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(input.id)
    .bind(input.account_id)
    .bind(&input.virtual_funds)
    .bind(input.level)
    .bind(input.streak_count)
    .bind(&input.profile_icon)
    .bind(input.total_trades)
    .bind(&input.net_profit)
    .bind(input.last_login_date)
    .fetch_one(executor)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_account(pool: &PgPool, account_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE account_id = $1"))
        .bind(account_id)
        .fetch_optional(pool)
        .await
}

/// Row-locks the profile for the rest of the enclosing transaction.
pub async fn fetch_for_update<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1 FOR UPDATE"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateProfile) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "UPDATE profiles
         SET level = $2, streak_count = $3, profile_icon = $4
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(input.level)
    .bind(input.streak_count)
    .bind(input.profile_icon)
    .fetch_optional(pool)
    .await
}

pub async fn update_login<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    streak_count: i32,
    last_login_date: DateTime<Utc>,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "UPDATE profiles
         SET streak_count = $2, last_login_date = $3
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(streak_count)
    .bind(last_login_date)
    .fetch_optional(executor)
    .await
}

/// Applies the balance and statistics effect of one executed trade.
pub async fn apply_trade<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    virtual_funds: &BigDecimal,
    realized_profit: &BigDecimal,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "UPDATE profiles
         SET virtual_funds = $2,
             net_profit = net_profit + $3,
             total_trades = total_trades + 1
         WHERE id = $1
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(virtual_funds)
    .bind(realized_profit)
    .fetch_one(executor)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
