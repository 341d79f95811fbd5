use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{
    AwardAchievement, CreateHolding, CreateTrade, ExecuteTrade, PortfolioHolding, Profile, StartQuest,
    Trade, TradeExecution, UpdateProfile, UserAchievement, UserQuest,
};
use crate::services::{achievement_service, holding_service, profile_service, quest_service, trade_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:profile_id", get(get_profile).put(update_profile).delete(delete_profile))
        .route("/:profile_id/login", post(record_login))
        .route("/:profile_id/trades", get(list_trades).post(record_trade))
        .route("/:profile_id/trades/execute", post(execute_trade))
        .route("/:profile_id/holdings", get(list_holdings).post(create_holding))
        .route("/:profile_id/quests", get(list_quest_progress).post(start_quest))
        .route("/:profile_id/achievements", get(list_achievements).post(award_achievement))
}

pub async fn get_profile(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, AppError> {
    info!("GET /profiles/{} - Fetching profile", profile_id);
    let profile = profile_service::fetch_one(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateProfile>,
) -> Result<Json<Profile>, AppError> {
    info!("PUT /profiles/{} - Updating profile", profile_id);
    let profile = profile_service::update(&state.pool, profile_id, data)
        .await
        .map_err(|e| {
            error!("Failed to update profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(profile))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /profiles/{} - Deleting profile", profile_id);
    profile_service::delete(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to delete profile {}: {}", profile_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_login(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, AppError> {
    info!("POST /profiles/{}/login - Recording login", profile_id);
    let profile = profile_service::record_login(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to record login for profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(profile))
}

pub async fn list_trades(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Trade>>, AppError> {
    info!("GET /profiles/{}/trades - Listing trades", profile_id);
    let trades = trade_service::list(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to list trades for profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(trades))
}

pub async fn record_trade(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<CreateTrade>,
) -> Result<(StatusCode, Json<Trade>), AppError> {
    info!("POST /profiles/{}/trades - Recording trade", profile_id);
    let trade = trade_service::record(&state.pool, profile_id, data)
        .await
        .map_err(|e| {
            error!("Failed to record trade for profile {}: {}", profile_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(trade)))
}

pub async fn execute_trade(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<ExecuteTrade>,
) -> Result<(StatusCode, Json<TradeExecution>), AppError> {
    info!("POST /profiles/{}/trades/execute - Executing {:?} {}", profile_id, data.trade_type, data.crypto_symbol);
    let execution = trade_service::execute(&state.pool, profile_id, data)
        .await
        .map_err(|e| {
            error!("Failed to execute trade for profile {}: {}", profile_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(execution)))
}

pub async fn list_holdings(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Vec<PortfolioHolding>>, AppError> {
    info!("GET /profiles/{}/holdings - Listing holdings", profile_id);
    let holdings = holding_service::list(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to list holdings for profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(holdings))
}

pub async fn create_holding(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<CreateHolding>,
) -> Result<(StatusCode, Json<PortfolioHolding>), AppError> {
    info!("POST /profiles/{}/holdings - Creating holding", profile_id);
    let holding = holding_service::create(&state.pool, profile_id, data)
        .await
        .map_err(|e| {
            error!("Failed to create holding for profile {}: {}", profile_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(holding)))
}

pub async fn list_quest_progress(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserQuest>>, AppError> {
    info!("GET /profiles/{}/quests - Listing quest progress", profile_id);
    let progress = quest_service::fetch_progress(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to list quests for profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(progress))
}

pub async fn start_quest(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<StartQuest>,
) -> Result<(StatusCode, Json<UserQuest>), AppError> {
    info!("POST /profiles/{}/quests - Starting quest {}", profile_id, data.quest_id);
    let user_quest = quest_service::start(&state.pool, profile_id, data.quest_id)
        .await
        .map_err(|e| {
            error!("Failed to start quest {} for profile {}: {}", data.quest_id, profile_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(user_quest)))
}

pub async fn list_achievements(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserAchievement>>, AppError> {
    info!("GET /profiles/{}/achievements - Listing earned achievements", profile_id);
    let earned = achievement_service::fetch_awarded(&state.pool, profile_id)
        .await
        .map_err(|e| {
            error!("Failed to list achievements for profile {}: {}", profile_id, e);
            e
        })?;
    Ok(Json(earned))
}

pub async fn award_achievement(
    State(state): State<AppState>,
    ApiPath(profile_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<AwardAchievement>,
) -> Result<(StatusCode, Json<UserAchievement>), AppError> {
    info!("POST /profiles/{}/achievements - Awarding {}", profile_id, data.achievement_id);
    let awarded = achievement_service::award(&state.pool, profile_id, data.achievement_id)
        .await
        .map_err(|e| {
            error!("Failed to award {} to profile {}: {}", data.achievement_id, profile_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(awarded)))
}
