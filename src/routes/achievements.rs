use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{Achievement, CreateAchievement, UpdateAchievement};
use crate::services::achievement_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_achievements).post(create_achievement))
        .route("/:achievement_id", get(get_achievement).put(update_achievement).delete(delete_achievement))
}

pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    info!("GET /achievements - Listing achievements");
    let achievements = achievement_service::fetch_all(&state.pool)
        .await
        .map_err(|e| {
            error!("Failed to list achievements: {}", e);
            e
        })?;
    Ok(Json(achievements))
}

pub async fn create_achievement(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateAchievement>,
) -> Result<(StatusCode, Json<Achievement>), AppError> {
    info!("POST /achievements - Creating achievement {}", data.name);
    let achievement = achievement_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create achievement: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

pub async fn get_achievement(
    State(state): State<AppState>,
    ApiPath(achievement_id): ApiPath<Uuid>,
) -> Result<Json<Achievement>, AppError> {
    info!("GET /achievements/{} - Fetching achievement", achievement_id);
    let achievement = achievement_service::fetch_one(&state.pool, achievement_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch achievement {}: {}", achievement_id, e);
            e
        })?;
    Ok(Json(achievement))
}

pub async fn update_achievement(
    State(state): State<AppState>,
    ApiPath(achievement_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateAchievement>,
) -> Result<Json<Achievement>, AppError> {
    info!("PUT /achievements/{} - Updating achievement", achievement_id);
    let achievement = achievement_service::update(&state.pool, achievement_id, data)
        .await
        .map_err(|e| {
            error!("Failed to update achievement {}: {}", achievement_id, e);
            e
        })?;
    Ok(Json(achievement))
}

pub async fn delete_achievement(
    State(state): State<AppState>,
    ApiPath(achievement_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /achievements/{} - Deleting achievement", achievement_id);
    achievement_service::delete(&state.pool, achievement_id)
        .await
        .map_err(|e| {
            error!("Failed to delete achievement {}: {}", achievement_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
