use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, instrument};

use crate::api::routes::AppState;
use crate::entities::blocks::{PublicBlock, PublicReading};
use crate::entities::common::PublicErrorResponse;
use crate::error::AppError;

/// All readings grouped into seven-day blocks, newest block first
#[utoipa::path(
    get,
    path = "/api/v1/blocks",
    responses(
        (status = 200, description = "Blocks, newest first", body = [PublicBlock]),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn list_blocks(State(state): State<AppState>) -> Result<impl IntoResponse, Response> {
    let blocks = state
        .entries
        .list_blocks()
        .await
        .map_err(|e| AppError::from(e).into_json_response())?;

    debug!("Returning {} blocks", blocks.len());
    let blocks: Vec<PublicBlock> = blocks.into_iter().map(PublicBlock::from).collect();
    Ok(Json(blocks))
}

/// All readings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/readings",
    responses(
        (status = 200, description = "Readings, newest first", body = [PublicReading]),
        (status = 500, description = "Internal server error", body = PublicErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(state))]
pub async fn list_readings(State(state): State<AppState>) -> Result<impl IntoResponse, Response> {
    let mut readings = state
        .entries
        .list_readings()
        .await
        .map_err(|e| AppError::from(e).into_json_response())?;

    readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let readings: Vec<PublicReading> = readings.into_iter().map(PublicReading::from).collect();
    Ok(Json(readings))
}
