//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::{path::Path, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
///
/// When `static_dir` is given, any other path is served from it, with
/// `index.html` at `/`.
pub fn create_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/state", get(get_state_handler).post(save_state_handler))
        .route("/api/closing", post(closing_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
