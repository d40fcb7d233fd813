pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::handlers;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    // Two base64 documents of up to 5MB each overflow axum's 2MB default.
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .route(
            "/api/v1/job-description/summary",
            post(handlers::handle_summarize),
        )
        .fallback(not_found)
        .layer(body_limit)
        .with_state(state)
}
