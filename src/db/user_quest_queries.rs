use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{QuestStatus, UserQuest};

pub async fn insert(pool: &PgPool, input: UserQuest) -> Result<UserQuest, sqlx::Error> {
    sqlx::query_as::<_, UserQuest>(
        "INSERT INTO user_quests (id, profile_id, quest_id, status, started_at, completed_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, profile_id, quest_id, status, started_at, completed_at"
    )
    .bind(input.id)
    .bind(input.profile_id)
    .bind(input.quest_id)
    .bind(input.status)
    .bind(input.started_at)
    .bind(input.completed_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<UserQuest>, sqlx::Error> {
    sqlx::query_as::<_, UserQuest>(
        "SELECT id, profile_id, quest_id, status, started_at, completed_at
         FROM user_quests
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_profile(pool: &PgPool, profile_id: Uuid) -> Result<Vec<UserQuest>, sqlx::Error> {
    sqlx::query_as::<_, UserQuest>(
        "SELECT id, profile_id, quest_id, status, started_at, completed_at
         FROM user_quests
         WHERE profile_id = $1
         ORDER BY started_at DESC"
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: QuestStatus,
    completed_at: Option<DateTime<Utc>>,
) -> Result<Option<UserQuest>, sqlx::Error> {
    sqlx::query_as::<_, UserQuest>(
        "UPDATE user_quests
         SET status = $2, completed_at = $3
         WHERE id = $1
         RETURNING id, profile_id, quest_id, status, started_at, completed_at"
    )
    .bind(id)
    .bind(status)
    .bind(completed_at)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_quests WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
