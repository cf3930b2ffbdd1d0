use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::artifacts::handlers;
use crate::features::artifacts::services::ArtifactService;

/// Create routes for the artifacts feature
pub fn routes(service: Arc<ArtifactService>) -> Router {
    Router::new()
        .route("/api/artifacts", get(handlers::search_artifacts))
        .route("/api/artifacts", post(handlers::create_artifact))
        .route("/api/artifacts/{id}", get(handlers::get_artifact))
        .route("/api/artifacts/{id}", delete(handlers::delete_artifact))
        .route(
            "/api/artifacts/{id}/versions",
            get(handlers::get_artifact_versions),
        )
        .route(
            "/api/artifacts/{id}/versions",
            post(handlers::add_artifact_version),
        )
        .with_state(service)
}
