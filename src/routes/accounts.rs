use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{Account, CreateAccount, Profile, RegisteredAccount, UpdateProfilePicture};
use crate::services::{account_service, profile_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/:account_id", get(get_account).delete(delete_account))
        .route("/:account_id/profile", get(get_account_profile))
        .route("/:account_id/profile-picture", put(update_profile_picture))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateAccount>,
) -> Result<(StatusCode, Json<RegisteredAccount>), AppError> {
    info!("POST /accounts - Registering {}", data.username.trim());
    let registered = account_service::register(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to register account: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(registered)))
}

pub async fn get_account(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Json<Account>, AppError> {
    info!("GET /accounts/{} - Fetching account", account_id);
    let account = account_service::fetch_one(&state.pool, account_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch account {}: {}", account_id, e);
            e
        })?;
    Ok(Json(account))
}

pub async fn get_account_profile(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, AppError> {
    info!("GET /accounts/{}/profile - Fetching profile", account_id);
    let profile = profile_service::fetch_by_account(&state.pool, account_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch profile for account {}: {}", account_id, e);
            e
        })?;
    Ok(Json(profile))
}

pub async fn update_profile_picture(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateProfilePicture>,
) -> Result<Json<Account>, AppError> {
    info!("PUT /accounts/{}/profile-picture - Updating profile picture", account_id);
    let account = account_service::update_profile_picture(&state.pool, account_id, data.profile_picture)
        .await
        .map_err(|e| {
            error!("Failed to update profile picture for {}: {}", account_id, e);
            e
        })?;
    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /accounts/{} - Deleting account", account_id);
    account_service::delete(&state.pool, account_id)
        .await
        .map_err(|e| {
            error!("Failed to delete account {}: {}", account_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
