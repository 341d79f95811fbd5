use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{CreateLeaderboard, Leaderboard, LeaderboardEntry, SubmitEntry};
use crate::services::leaderboard_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leaderboards).post(create_leaderboard))
        .route("/:leaderboard_id", get(get_leaderboard).delete(delete_leaderboard))
        .route("/:leaderboard_id/entries", get(list_entries).put(submit_entry))
        .route("/:leaderboard_id/rank", post(recompute_ranks))
}

pub fn entry_router() -> Router<AppState> {
    Router::new()
        .route("/:entry_id", delete(remove_entry))
}

pub async fn list_leaderboards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Leaderboard>>, AppError> {
    info!("GET /leaderboards - Listing leaderboards");
    let boards = leaderboard_service::fetch_all(&state.pool)
        .await
        .map_err(|e| {
            error!("Failed to list leaderboards: {}", e);
            e
        })?;
    Ok(Json(boards))
}

pub async fn create_leaderboard(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateLeaderboard>,
) -> Result<(StatusCode, Json<Leaderboard>), AppError> {
    info!("POST /leaderboards - Creating {:?} leaderboard", data.leaderboard_type);
    let board = leaderboard_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create leaderboard: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    ApiPath(leaderboard_id): ApiPath<Uuid>,
) -> Result<Json<Leaderboard>, AppError> {
    info!("GET /leaderboards/{} - Fetching leaderboard", leaderboard_id);
    let board = leaderboard_service::fetch_one(&state.pool, leaderboard_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch leaderboard {}: {}", leaderboard_id, e);
            e
        })?;
    Ok(Json(board))
}

pub async fn delete_leaderboard(
    State(state): State<AppState>,
    ApiPath(leaderboard_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /leaderboards/{} - Deleting leaderboard", leaderboard_id);
    leaderboard_service::delete(&state.pool, leaderboard_id)
        .await
        .map_err(|e| {
            error!("Failed to delete leaderboard {}: {}", leaderboard_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_entries(
    State(state): State<AppState>,
    ApiPath(leaderboard_id): ApiPath<Uuid>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    info!("GET /leaderboards/{}/entries - Listing entries", leaderboard_id);
    let entries = leaderboard_service::fetch_entries(&state.pool, leaderboard_id)
        .await
        .map_err(|e| {
            error!("Failed to list entries for leaderboard {}: {}", leaderboard_id, e);
            e
        })?;
    Ok(Json(entries))
}

pub async fn submit_entry(
    State(state): State<AppState>,
    ApiPath(leaderboard_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<SubmitEntry>,
) -> Result<Json<LeaderboardEntry>, AppError> {
    info!("PUT /leaderboards/{}/entries - Submitting profit for {}", leaderboard_id, data.profile_id);
    let entry = leaderboard_service::submit_entry(&state.pool, leaderboard_id, data)
        .await
        .map_err(|e| {
            error!("Failed to submit entry on leaderboard {}: {}", leaderboard_id, e);
            e
        })?;
    Ok(Json(entry))
}

pub async fn recompute_ranks(
    State(state): State<AppState>,
    ApiPath(leaderboard_id): ApiPath<Uuid>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    info!("POST /leaderboards/{}/rank - Recomputing ranks", leaderboard_id);
    let entries = leaderboard_service::recompute_ranks(&state.pool, leaderboard_id)
        .await
        .map_err(|e| {
            error!("Failed to rank leaderboard {}: {}", leaderboard_id, e);
            e
        })?;
    Ok(Json(entries))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    ApiPath(entry_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /leaderboard-entries/{} - Removing entry", entry_id);
    leaderboard_service::remove_entry(&state.pool, entry_id)
        .await
        .map_err(|e| {
            error!("Failed to remove leaderboard entry {}: {}", entry_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
