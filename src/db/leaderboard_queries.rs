use bigdecimal::BigDecimal;
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{CreateLeaderboard, Leaderboard, LeaderboardEntry};

pub async fn create(pool: &PgPool, input: CreateLeaderboard) -> Result<Leaderboard, sqlx::Error> {
    sqlx::query_as::<_, Leaderboard>(
        "INSERT INTO leaderboards (id, leaderboard_type, start_date, end_date)
         VALUES ($1, $2, $3, $4)
         RETURNING id, leaderboard_type, start_date, end_date"
    )
    .bind(Uuid::new_v4())
    .bind(input.leaderboard_type)
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Leaderboard>, sqlx::Error> {
    sqlx::query_as::<_, Leaderboard>(
        "SELECT id, leaderboard_type, start_date, end_date
         FROM leaderboards
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Leaderboard>, sqlx::Error> {
    sqlx::query_as::<_, Leaderboard>(
        "SELECT id, leaderboard_type, start_date, end_date
         FROM leaderboards
         ORDER BY start_date DESC"
    )
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leaderboards WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn fetch_entries<'e, E: PgExecutor<'e>>(
    executor: E,
    leaderboard_id: Uuid,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT id, leaderboard_id, profile_id, profit, rank, created_at
         FROM leaderboard_entries
         WHERE leaderboard_id = $1
         ORDER BY rank, created_at"
    )
    .bind(leaderboard_id)
    .fetch_all(executor)
    .await
}

/// Row lock on the leaderboard; entry writes for the same board queue behind it.
pub async fn lock<'e, E: PgExecutor<'e>>(executor: E, leaderboard_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM leaderboards WHERE id = $1 FOR UPDATE")
        .bind(leaderboard_id)
        .fetch_optional(executor)
        .await
}

/// Updates the profile's entry if one exists, otherwise appends one ranked last.
/// Returns `None` when the leaderboard does not exist.
pub async fn upsert_entry(
    pool: &PgPool,
    leaderboard_id: Uuid,
    profile_id: Uuid,
    profit: &BigDecimal,
) -> Result<Option<LeaderboardEntry>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    if lock(&mut *tx, leaderboard_id).await?.is_none() {
        return Ok(None);
    }

    let updated = sqlx::query_as::<_, LeaderboardEntry>(
        "UPDATE leaderboard_entries
         SET profit = $3
         WHERE leaderboard_id = $1 AND profile_id = $2
         RETURNING id, leaderboard_id, profile_id, profit, rank, created_at"
    )
    .bind(leaderboard_id)
    .bind(profile_id)
    .bind(profit)
    .fetch_optional(&mut *tx)
    .await?;

    let entry = match updated {
        Some(entry) => entry,
        None => {
            sqlx::query_as::<_, LeaderboardEntry>(
                "INSERT INTO leaderboard_entries (id, leaderboard_id, profile_id, profit, rank)
                 VALUES ($1, $2, $3, $4,
                         (SELECT COUNT(*) + 1 FROM leaderboard_entries WHERE leaderboard_id = $2))
                 RETURNING id, leaderboard_id, profile_id, profit, rank, created_at"
            )
            .bind(Uuid::new_v4())
            .bind(leaderboard_id)
            .bind(profile_id)
            .bind(profit)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(Some(entry))
}

pub async fn set_rank<'e, E: PgExecutor<'e>>(executor: E, entry_id: Uuid, rank: i32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE leaderboard_entries SET rank = $2 WHERE id = $1")
        .bind(entry_id)
        .bind(rank)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_entry(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leaderboard_entries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
