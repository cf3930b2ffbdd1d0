use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::feedback::handlers;
use crate::features::feedback::services::FeedbackService;

/// Create routes for the feedback feature
pub fn routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route("/api/feedback", post(handlers::submit_feedback))
        .route("/api/feedback/{artifact_id}", get(handlers::get_feedback))
        .with_state(service)
}
