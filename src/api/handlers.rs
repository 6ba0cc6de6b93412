//! HTTP endpoint handlers
//!
//! Store calls block on disk I/O, so every handler runs them through
//! `spawn_blocking`.

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    error::StoreError,
    shutdown::{AfterSave, ShutdownOutcome},
    state::{AppState, Document},
};
use super::responses::{ApiResponse, ClosingResponse, HealthResponse, StatusResponse};

type ApiError = (StatusCode, Json<ApiResponse>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// Handle GET /api/state - Return the stored document
///
/// A read failure still returns a usable body (the empty document) but with
/// a 500 status so the client can tell its state was not loaded.
pub async fn get_state_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Document>) {
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || store.try_load()).await {
        Ok(Ok(doc)) => (StatusCode::OK, Json(doc)),
        Ok(Err(e)) => {
            error!("Failed to load state: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Document::default()))
        }
        Err(e) => {
            error!("State load task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Document::default()))
        }
    }
}

/// Handle POST /api/state - Replace the stored document
pub async fn save_state_handler(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<Document>,
) -> Result<Json<ApiResponse>, ApiError> {
    let timer_count = doc.timers.len();
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || store.save(&doc)).await {
        Ok(Ok(())) => {
            state.record_action("save");
            Ok(Json(ApiResponse::ok(format!("Saved {} timers", timer_count))))
        }
        Ok(Err(StoreError::Sealed)) => {
            warn!("Rejecting state write during shutdown");
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Server is shutting down".to_string(),
            ))
        }
        Ok(Err(e)) => {
            error!("Failed to save state: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
        Err(e) => {
            error!("State save task failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "State save task failed".to_string(),
            ))
        }
    }
}

/// Handle POST /api/closing - Window-closing event from an embedding shell
///
/// Pauses and persists all running timers, then keeps serving and accepting
/// writes.
pub async fn closing_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClosingResponse>, ApiError> {
    info!("Window closing, pausing timers");
    let hook = state.hook.clone();
    match tokio::task::spawn_blocking(move || hook.on_termination_requested(AfterSave::KeepServing)).await {
        Ok(Ok(result)) => {
            if let ShutdownOutcome::Persisted(_) = result {
                state.record_action("window-closing");
            }
            Ok(Json(ClosingResponse {
                status: "ok".to_string(),
                timestamp: Utc::now(),
                result,
            }))
        }
        Ok(Err(StoreError::Sealed)) => Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Server is shutting down".to_string(),
        )),
        Ok(Err(e)) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
        Err(e) => {
            error!("Closing hook task failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Closing hook task failed".to_string(),
            ))
        }
    }
}

/// Handle GET /status - Return server status and a timer summary
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let store = Arc::clone(&state.store);
    let doc = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| {
            error!("Status load task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        state_file: state.store.path().display().to_string(),
        is_paused: doc.is_paused,
        timer_count: doc.timers.len(),
        timers_by_state: doc.state_counts(),
        shutting_down: state.is_shutting_down() || state.store.is_sealed(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
