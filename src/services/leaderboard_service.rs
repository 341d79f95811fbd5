use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{CreateLeaderboard, Leaderboard, LeaderboardEntry, SubmitEntry};
use crate::services::profile_service;
use crate::services::trade_service::check_currency;

/// Ranks entries by profit, highest first; equal profits keep submission order.
/// Returns `(entry_id, rank)` pairs with ranks starting at 1.
pub(crate) fn assign_ranks(entries: &[LeaderboardEntry]) -> Vec<(Uuid, i32)> {
    let mut ordered: Vec<&LeaderboardEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| b.profit.cmp(&a.profit).then(a.created_at.cmp(&b.created_at)));
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| (entry.id, idx as i32 + 1))
        .collect()
}

pub async fn create(pool: &PgPool, input: CreateLeaderboard) -> Result<Leaderboard, AppError> {
    if input.start_date > input.end_date {
        return Err(AppError::Validation("Leaderboard start date must not be after end date".into()));
    }
    Ok(db::leaderboard_queries::create(pool, input).await?)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Leaderboard>, AppError> {
    Ok(db::leaderboard_queries::fetch_all(pool).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Leaderboard, AppError> {
    db::leaderboard_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Leaderboard {} not found", id)))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::leaderboard_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Leaderboard {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

pub async fn fetch_entries(pool: &PgPool, leaderboard_id: Uuid) -> Result<Vec<LeaderboardEntry>, AppError> {
    fetch_one(pool, leaderboard_id).await?;
    Ok(db::leaderboard_queries::fetch_entries(pool, leaderboard_id).await?)
}

pub async fn submit_entry(pool: &PgPool, leaderboard_id: Uuid, input: SubmitEntry) -> Result<LeaderboardEntry, AppError> {
    fetch_one(pool, leaderboard_id).await?;
    profile_service::ensure_exists(pool, input.profile_id).await?;
    let profit: BigDecimal = input.profit.round(2);
    check_currency("Profit", &profit)?;
    db::leaderboard_queries::upsert_entry(pool, leaderboard_id, input.profile_id, &profit).await?
        .ok_or_else(|| AppError::NotFound(format!("Leaderboard {} not found", leaderboard_id)))
}

pub async fn remove_entry(pool: &PgPool, entry_id: Uuid) -> Result<u64, AppError> {
    match db::leaderboard_queries::delete_entry(pool, entry_id).await {
        Ok(0) => Err(AppError::NotFound(format!("Leaderboard entry {} not found", entry_id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

/// Rewrites every entry's rank from its profit and returns the ordered board.
pub async fn recompute_ranks(pool: &PgPool, leaderboard_id: Uuid) -> Result<Vec<LeaderboardEntry>, AppError> {
    fetch_one(pool, leaderboard_id).await?;

    let mut tx = pool.begin().await?;
    db::leaderboard_queries::lock(&mut *tx, leaderboard_id).await?;
    let entries = db::leaderboard_queries::fetch_entries(&mut *tx, leaderboard_id).await?;
    let ranks = assign_ranks(&entries);
    for (entry_id, rank) in &ranks {
        db::leaderboard_queries::set_rank(&mut *tx, *entry_id, *rank).await?;
    }
    let ranked = db::leaderboard_queries::fetch_entries(&mut *tx, leaderboard_id).await?;
    tx.commit().await?;

    info!("Re-ranked {} entries on leaderboard {}", ranks.len(), leaderboard_id);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(profit: &str, seconds: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            id: Uuid::new_v4(),
            leaderboard_id: Uuid::nil(),
            profile_id: Uuid::new_v4(),
            profit: profit.parse().unwrap(),
            rank: 0,
            created_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    #[test]
    fn test_ranks_follow_profit_descending() {
        let entries = vec![entry("10.00", 0), entry("250.50", 1), entry("-40.00", 2), entry("99.99", 3)];
        let ranks = assign_ranks(&entries);

        assert_eq!(ranks, vec![
            (entries[1].id, 1),
            (entries[3].id, 2),
            (entries[0].id, 3),
            (entries[2].id, 4),
        ]);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let entries = vec![entry("50", 5), entry("50.00", 1), entry("75", 9)];
        let ranks = assign_ranks(&entries);

        assert_eq!(ranks, vec![(entries[2].id, 1), (entries[1].id, 2), (entries[0].id, 3)]);
    }

    #[test]
    fn test_empty_board() {
        assert!(assign_ranks(&[]).is_empty());
    }
}
