use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{CreateQuest, Quest, QuestFilter, Trade, UpdateQuest, UpdateQuestStatus, UserQuest};
use crate::services::{quest_service, trade_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quests).post(create_quest))
        .route("/:quest_id", get(get_quest).put(update_quest).delete(delete_quest))
        .route("/:quest_id/trades", get(list_quest_trades))
}

pub fn user_quest_router() -> Router<AppState> {
    Router::new()
        .route("/:user_quest_id", get(get_user_quest).put(update_status).delete(abandon))
}

pub async fn list_quests(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<QuestFilter>,
) -> Result<Json<Vec<Quest>>, AppError> {
    info!("GET /quests - Listing quests (type {:?})", filter.quest_type);
    let quests = quest_service::fetch_all(&state.pool, filter.quest_type)
        .await
        .map_err(|e| {
            error!("Failed to list quests: {}", e);
            e
        })?;
    Ok(Json(quests))
}

pub async fn create_quest(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateQuest>,
) -> Result<(StatusCode, Json<Quest>), AppError> {
    info!("POST /quests - Creating quest");
    let quest = quest_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create quest: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(quest)))
}

pub async fn get_quest(
    State(state): State<AppState>,
    ApiPath(quest_id): ApiPath<Uuid>,
) -> Result<Json<Quest>, AppError> {
    info!("GET /quests/{} - Fetching quest", quest_id);
    let quest = quest_service::fetch_one(&state.pool, quest_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch quest {}: {}", quest_id, e);
            e
        })?;
    Ok(Json(quest))
}

pub async fn update_quest(
    State(state): State<AppState>,
    ApiPath(quest_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateQuest>,
) -> Result<Json<Quest>, AppError> {
    info!("PUT /quests/{} - Updating quest", quest_id);
    let quest = quest_service::update(&state.pool, quest_id, data)
        .await
        .map_err(|e| {
            error!("Failed to update quest {}: {}", quest_id, e);
            e
        })?;
    Ok(Json(quest))
}

pub async fn delete_quest(
    State(state): State<AppState>,
    ApiPath(quest_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /quests/{} - Deleting quest", quest_id);
    quest_service::delete(&state.pool, quest_id)
        .await
        .map_err(|e| {
            error!("Failed to delete quest {}: {}", quest_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_quest_trades(
    State(state): State<AppState>,
    ApiPath(quest_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Trade>>, AppError> {
    info!("GET /quests/{}/trades - Listing trades tagged with quest", quest_id);
    let trades = trade_service::list_for_quest(&state.pool, quest_id)
        .await
        .map_err(|e| {
            error!("Failed to list trades for quest {}: {}", quest_id, e);
            e
        })?;
    Ok(Json(trades))
}

pub async fn get_user_quest(
    State(state): State<AppState>,
    ApiPath(user_quest_id): ApiPath<Uuid>,
) -> Result<Json<UserQuest>, AppError> {
    info!("GET /user-quests/{} - Fetching quest progress", user_quest_id);
    let user_quest = quest_service::fetch_user_quest(&state.pool, user_quest_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch user quest {}: {}", user_quest_id, e);
            e
        })?;
    Ok(Json(user_quest))
}

pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(user_quest_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateQuestStatus>,
) -> Result<Json<UserQuest>, AppError> {
    info!("PUT /user-quests/{} - Setting status {:?}", user_quest_id, data.status);
    let user_quest = quest_service::update_status(&state.pool, user_quest_id, data.status)
        .await
        .map_err(|e| {
            error!("Failed to update user quest {}: {}", user_quest_id, e);
            e
        })?;
    Ok(Json(user_quest))
}

pub async fn abandon(
    State(state): State<AppState>,
    ApiPath(user_quest_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /user-quests/{} - Abandoning quest", user_quest_id);
    quest_service::abandon(&state.pool, user_quest_id)
        .await
        .map_err(|e| {
            error!("Failed to delete user quest {}: {}", user_quest_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
