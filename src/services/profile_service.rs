use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{Profile, UpdateProfile};
use crate::services::check_len;

const MAX_ICON_LEN: usize = 255;

/// Streak after logging in at `now`: same UTC day keeps it, the next day
/// extends it, any longer gap (or a first login) restarts it at 1.
pub(crate) fn next_streak(last_login: Option<DateTime<Utc>>, current: i32, now: DateTime<Utc>) -> i32 {
    let Some(last) = last_login else {
        return 1;
    };
    let gap_days = (now.date_naive() - last.date_naive()).num_days();
    match gap_days {
        0 => current.max(1),
        1 => current + 1,
        _ => 1,
    }
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Profile, AppError> {
    db::profile_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
}

pub async fn fetch_by_account(pool: &PgPool, account_id: Uuid) -> Result<Profile, AppError> {
    db::profile_queries::fetch_by_account(pool, account_id).await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for account {}", account_id)))
}

fn validate_update(input: &UpdateProfile) -> Result<(), AppError> {
    if input.level < 0 {
        return Err(AppError::Validation("Level cannot be negative".into()));
    }
    if input.streak_count < 0 {
        return Err(AppError::Validation("Streak count cannot be negative".into()));
    }
    if let Some(icon) = &input.profile_icon {
        check_len("Profile icon", icon, MAX_ICON_LEN)?;
    }
    Ok(())
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateProfile) -> Result<Profile, AppError> {
    validate_update(&input)?;
    db::profile_queries::update(pool, id, input).await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
}

pub async fn record_login(pool: &PgPool, id: Uuid) -> Result<Profile, AppError> {
    let mut tx = pool.begin().await?;
    let profile = db::profile_queries::fetch_for_update(&mut *tx, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

    let now = Utc::now();
    let streak = next_streak(profile.last_login_date, profile.streak_count, now);
    let updated = db::profile_queries::update_login(&mut *tx, id, streak, now).await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;
    tx.commit().await?;

    info!("Profile {} logged in, streak {}", id, streak);
    Ok(updated)
}

// The owning account is left in place; deleting the account removes both.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::profile_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Profile {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

pub(crate) async fn ensure_exists(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    if db::profile_queries::exists(pool, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Profile {} not found", id)))
    }
}
