use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{Achievement, CreateAchievement, UpdateAchievement, UserAchievement};

pub async fn create(pool: &PgPool, input: CreateAchievement) -> Result<Achievement, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        "INSERT INTO achievements (id, name, description, criteria_description, badge_icon)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, description, criteria_description, badge_icon"
    )
    .bind(Uuid::new_v4())
    .bind(input.name)
    .bind(input.description)
    .bind(input.criteria_description)
    .bind(input.badge_icon)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Achievement>, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        "SELECT id, name, description, criteria_description, badge_icon
         FROM achievements
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        "SELECT id, name, description, criteria_description, badge_icon
         FROM achievements
         ORDER BY name"
    )
    .fetch_all(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateAchievement) -> Result<Option<Achievement>, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        "UPDATE achievements
         SET name = $2, description = $3, criteria_description = $4, badge_icon = $5
         WHERE id = $1
         RETURNING id, name, description, criteria_description, badge_icon"
    )
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.criteria_description)
    .bind(input.badge_icon)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM achievements WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn award(pool: &PgPool, profile_id: Uuid, achievement_id: Uuid) -> Result<UserAchievement, sqlx::Error> {
    sqlx::query_as::<_, UserAchievement>(
        "INSERT INTO user_achievements (id, profile_id, achievement_id)
         VALUES ($1, $2, $3)
         RETURNING id, profile_id, achievement_id, achieved_at"
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(achievement_id)
    .fetch_one(pool)
    .await
}

pub async fn fetch_awarded(pool: &PgPool, profile_id: Uuid) -> Result<Vec<UserAchievement>, sqlx::Error> {
    sqlx::query_as::<_, UserAchievement>(
        "SELECT id, profile_id, achievement_id, achieved_at
         FROM user_achievements
         WHERE profile_id = $1
         ORDER BY achieved_at DESC"
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}
