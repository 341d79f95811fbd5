use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::ApiPath;
use crate::models::Trade;
use crate::services::trade_service;
use crate::state::AppState;

// Trades are append-only: no update or delete routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:trade_id", get(get_trade))
}

pub async fn get_trade(
    State(state): State<AppState>,
    ApiPath(trade_id): ApiPath<Uuid>,
) -> Result<Json<Trade>, AppError> {
    info!("GET /trades/{} - Fetching trade", trade_id);
    let trade = trade_service::fetch_one(&state.pool, trade_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch trade {}: {}", trade_id, e);
            e
        })?;
    Ok(Json(trade))
}
