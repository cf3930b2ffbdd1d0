use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::files::handlers;
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/api/files/upload", post(handlers::upload_file))
        .with_state(service)
}
