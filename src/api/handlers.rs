//! HTTP request handlers for the coffee team API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use crate::models::TabularArtifact;

use super::response::{ApiError, ApiErrorResponse, GroupingResponse, SwapResponse};
use super::state::AppState;
use super::store::StoredArtifact;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(grouping_handler))
        .route("/swaps", get(swap_handler))
        .route("/artifacts/:file", get(artifact_handler))
        .with_state(state)
}

/// Handler for GET / endpoint.
///
/// Draws a fresh grouping, stores it as CSV and spreadsheet, and returns
/// the records with both download paths.
async fn grouping_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing grouping request");

    let start_time = Instant::now();
    match produce_and_store(&state).await {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                records = body.records.len(),
                csv = %body.csv_path,
                xlsx = %body.xlsx_path,
                duration_us = start_time.elapsed().as_micros(),
                "Grouping completed successfully"
            );
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Grouping failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /swaps endpoint.
///
/// Draws a fresh desk swap and stores it like a grouping.
async fn swap_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing swap request");

    let start_time = Instant::now();
    match produce_swaps_and_store(&state).await {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                records = body.records.len(),
                csv = %body.csv_path,
                duration_us = start_time.elapsed().as_micros(),
                "Swap completed successfully"
            );
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Swap failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

async fn produce_and_store(state: &AppState) -> EngineResult<GroupingResponse> {
    let artifact = state.pipeline().produce_grouping(state.grouping()).await?;
    let (csv_name, sheet_name) = store_artifact(state, &artifact).await?;
    Ok(GroupingResponse::new(&artifact, &csv_name, &sheet_name))
}

async fn produce_swaps_and_store(state: &AppState) -> EngineResult<SwapResponse> {
    let artifact = state
        .pipeline()
        .produce_swaps(state.grouping(), state.swap())
        .await?;
    let (csv_name, sheet_name) = store_artifact(state, &artifact).await?;
    Ok(SwapResponse::new(&artifact, &csv_name, &sheet_name))
}

/// Renders CSV and spreadsheet, stores both under one stem, and returns
/// their names.
async fn store_artifact(
    state: &AppState,
    artifact: &TabularArtifact,
) -> EngineResult<(String, String)> {
    let csv = artifact.to_csv()?;
    let sheet = state.emitter().emit(artifact).await?;
    let extension = state.emitter().extension();

    let names = state
        .store()
        .insert_set(vec![
            ("csv", StoredArtifact::new("csv", csv)),
            (extension, StoredArtifact::new(extension, sheet)),
        ])
        .await;
    match <[String; 2]>::try_from(names) {
        Ok([csv_name, sheet_name]) => Ok((csv_name, sheet_name)),
        Err(names) => Err(EngineError::ArtifactError {
            message: format!("expected 2 stored files, got {}", names.len()),
        }),
    }
}

/// Handler for GET /artifacts/:file endpoint.
async fn artifact_handler(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    match state.store().get(&file).await {
        Some(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        None => {
            warn!(file = %file, "Artifact not found");
            ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::artifact_not_found(&file))
                .into_response()
        }
    }
}
