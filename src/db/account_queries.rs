use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Account, Profile};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, profile_picture, created_at";

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS}
         FROM accounts
         WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_username(pool: &PgPool, username: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS}
         FROM accounts
         WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, input: &Account) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "INSERT INTO accounts (id, username, email, password_hash, profile_picture, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(input.id)
    .bind(&input.username)
    .bind(&input.email)
    .bind(&input.password_hash)
    .bind(&input.profile_picture)
    .bind(input.created_at)
    .fetch_one(executor)
    .await
}

/// Registration: the account and its profile are written together or not at all.
pub async fn create_with_profile(pool: &PgPool, account: Account) -> Result<(Account, Profile), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let account = insert(&mut *tx, &account).await?;
    let profile = super::profile_queries::insert(&mut *tx, &Profile::new(account.id)).await?;
    tx.commit().await?;
    Ok((account, profile))
}

pub async fn update_profile_picture(
    pool: &PgPool,
    id: Uuid,
    profile_picture: Option<String>,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "UPDATE accounts
         SET profile_picture = $2
         WHERE id = $1
         RETURNING {ACCOUNT_COLUMNS}"
    ))
    .bind(id)
    .bind(profile_picture)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
