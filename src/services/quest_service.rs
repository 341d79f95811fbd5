use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use crate::db;
use crate::errors::AppError;
use crate::models::{CreateQuest, Quest, QuestStatus, QuestType, UpdateQuest, UserQuest};
use crate::services::{check_len, profile_service};

const MAX_TITLE_LEN: usize = 255;

fn validate(input: &CreateQuest) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("Quest title cannot be empty".into()));
    }
    check_len("Quest title", &input.title, MAX_TITLE_LEN)?;
    if input.goal_description.trim().is_empty() {
        return Err(AppError::Validation("Quest goal cannot be empty".into()));
    }
    if input.reward_points < 0 {
        return Err(AppError::Validation("Reward points cannot be negative".into()));
    }
    Ok(())
}

pub async fn create(pool: &PgPool, input: CreateQuest) -> Result<Quest, AppError> {
    validate(&input)?;
    let quest = db::quest_queries::insert(pool, Quest::new(input)).await?;
    Ok(quest)
}

pub async fn fetch_all(pool: &PgPool, quest_type: Option<QuestType>) -> Result<Vec<Quest>, AppError> {
    Ok(db::quest_queries::fetch_all(pool, quest_type).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Quest, AppError> {
    db::quest_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("Quest {} not found", id)))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateQuest) -> Result<Quest, AppError> {
    validate(&input)?;
    db::quest_queries::update(pool, id, input).await?
        .ok_or_else(|| AppError::NotFound(format!("Quest {} not found", id)))
}

// Trades tagged with the quest keep their rows; their quest_id is cleared.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::quest_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("Quest {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}

pub async fn start(pool: &PgPool, profile_id: Uuid, quest_id: Uuid) -> Result<UserQuest, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    let quest = fetch_one(pool, quest_id).await?;
    if let Some(expires_at) = quest.expires_at {
        if expires_at <= Utc::now() {
            return Err(AppError::Validation(format!("Quest {} has expired", quest_id)));
        }
    }
    Ok(db::user_quest_queries::insert(pool, UserQuest::start(profile_id, quest_id)).await?)
}

pub async fn fetch_progress(pool: &PgPool, profile_id: Uuid) -> Result<Vec<UserQuest>, AppError> {
    profile_service::ensure_exists(pool, profile_id).await?;
    Ok(db::user_quest_queries::fetch_by_profile(pool, profile_id).await?)
}

pub async fn fetch_user_quest(pool: &PgPool, id: Uuid) -> Result<UserQuest, AppError> {
    db::user_quest_queries::fetch_one(pool, id).await?
        .ok_or_else(|| AppError::NotFound(format!("User quest {} not found", id)))
}

pub async fn update_status(pool: &PgPool, id: Uuid, status: QuestStatus) -> Result<UserQuest, AppError> {
    let completed_at = status.completed_at(Utc::now());
    db::user_quest_queries::update_status(pool, id, status, completed_at).await?
        .ok_or_else(|| AppError::NotFound(format!("User quest {} not found", id)))
}

pub async fn abandon(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    match db::user_quest_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound(format!("User quest {} not found", id))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::from(e)),
    }
}
