pub mod health;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeFile;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, index_path: impl AsRef<Path>) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(index_path))
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
