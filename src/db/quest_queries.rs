use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Quest, QuestType, UpdateQuest};

pub async fn insert(pool: &PgPool, input: Quest) -> Result<Quest, sqlx::Error> {
    sqlx::query_as::<_, Quest>(
        "INSERT INTO quests (id, title, description, quest_type, goal_description, reward_points, expires_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, title, description, quest_type, goal_description, reward_points, expires_at"
    )
    .bind(input.id)
    .bind(input.title)
    .bind(input.description)
    .bind(input.quest_type)
    .bind(input.goal_description)
    .bind(input.reward_points)
    .bind(input.expires_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Quest>, sqlx::Error> {
    sqlx::query_as::<_, Quest>(
        "SELECT id, title, description, quest_type, goal_description, reward_points, expires_at
         FROM quests
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool, quest_type: Option<QuestType>) -> Result<Vec<Quest>, sqlx::Error> {
    sqlx::query_as::<_, Quest>(
        "SELECT id, title, description, quest_type, goal_description, reward_points, expires_at
         FROM quests
         WHERE ($1::VARCHAR IS NULL OR quest_type = $1)
         ORDER BY title"
    )
    .bind(quest_type)
    .fetch_all(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateQuest) -> Result<Option<Quest>, sqlx::Error> {
    sqlx::query_as::<_, Quest>(
        "UPDATE quests
         SET title = $2, description = $3, quest_type = $4, goal_description = $5,
             reward_points = $6, expires_at = $7
         WHERE id = $1
         RETURNING id, title, description, quest_type, goal_description, reward_points, expires_at"
    )
    .bind(id)
    .bind(input.title)
    .bind(input.description)
    .bind(input.quest_type)
    .bind(input.goal_description)
    .bind(input.reward_points)
    .bind(input.expires_at)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quests WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
