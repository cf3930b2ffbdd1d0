use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// The whole surface sits behind the JWT middleware; the tree and display
/// endpoints additionally read the caller's identity.
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories", post(handlers::create_category))
        .route("/api/categories/tree", get(handlers::get_category_tree))
        .route("/api/categories/rearrange", post(handlers::rearrange_category))
        .route("/api/categories/{id}", get(handlers::get_category))
        .route("/api/categories/{id}", put(handlers::rename_category))
        .route("/api/categories/{id}", delete(handlers::delete_category))
        .route(
            "/api/categories/{id}/display",
            post(handlers::set_display_preference),
        )
        .with_state(service)
}
