use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{PortfolioHolding, UpdateHolding};
use crate::services::holding_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:holding_id", get(get_holding).put(update_holding).delete(delete_holding))
}

pub async fn get_holding(
    State(state): State<AppState>,
    ApiPath(holding_id): ApiPath<Uuid>,
) -> Result<Json<PortfolioHolding>, AppError> {
    info!("GET /holdings/{} - Fetching holding", holding_id);
    let holding = holding_service::fetch_one(&state.pool, holding_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch holding {}: {}", holding_id, e);
            e
        })?;
    Ok(Json(holding))
}

pub async fn update_holding(
    State(state): State<AppState>,
    ApiPath(holding_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateHolding>,
) -> Result<Json<PortfolioHolding>, AppError> {
    info!("PUT /holdings/{} - Updating holding", holding_id);
    let holding = holding_service::update(&state.pool, holding_id, data)
        .await
        .map_err(|e| {
            error!("Failed to update holding {}: {}", holding_id, e);
            e
        })?;
    Ok(Json(holding))
}

pub async fn delete_holding(
    State(state): State<AppState>,
    ApiPath(holding_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /holdings/{} - Deleting holding", holding_id);
    holding_service::delete(&state.pool, holding_id)
        .await
        .map_err(|e| {
            error!("Failed to delete holding {}: {}", holding_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
