use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::downloads::handlers;
use crate::features::downloads::services::DownloadService;

/// Create routes for the downloads feature
pub fn routes(service: Arc<DownloadService>) -> Router {
    Router::new()
        .route("/api/downloads/file", post(handlers::download_file))
        .route("/api/downloads/history", get(handlers::download_history))
        .with_state(service)
}
