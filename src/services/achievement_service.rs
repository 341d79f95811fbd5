use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{Achievement, CreateAchievement, UpdateAchievement, UserAchievement};
use crate::services::{check_len, profile_service};

const MAX_NAME_LEN: usize = 100;
const MAX_BADGE_LEN: usize = 255;

fn validate(input: &CreateAchievement) -> Result<(), AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Achievement name cannot be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Achievement name cannot be longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    if input.badge_icon.trim().is_empty() {
        return Err(AppError::Validation("Badge icon cannot be empty".into()));
    }
    check_len("Badge icon", &input.badge_icon, MAX_BADGE_LEN)?;
    Ok(())
}

pub async fn create(pool: &PgPool, input: CreateAchievement) -> Result<Achievement, AppError> {
    validate(&input)?;
    Ok(db::achievement_queries::create(pool, input).await?)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Achievement>, AppError> {
    Ok(db::achievement_queries::fetch_all(pool).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Achievement, AppError> {
    db::achievement_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Achievement {} not found", id)))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateAchievement) -> Result<Achievement, AppError> {
    validate(&input)?;
    db::achievement_queries::update(pool, id, input).await?
        .ok_or_else(|| AppError::NotFound(format!("Achievement {} not found", id)))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::achievement_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Achievement {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

pub async fn award(pool: &PgPool, profile_id: Uuid, achievement_id: Uuid) -> Result<UserAchievement, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    fetch_one(pool, achievement_id).await?;
    let awarded = db::achievement_queries::award(pool, profile_id, achievement_id).await?;
    info!("Awarded achievement {} to profile {}", achievement_id, profile_id);
    Ok(awarded)
}

pub async fn fetch_awarded(pool: &PgPool, profile_id: Uuid) -> Result<Vec<UserAchievement>, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::achievement_queries::fetch_awarded(pool, profile_id).await?)
}
