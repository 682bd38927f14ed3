pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/extract/batch", post(handlers::handle_extract_batch))
        .route("/api/v1/select", post(handlers::handle_select))
        .fallback(not_found)
        .with_state(state)
}
