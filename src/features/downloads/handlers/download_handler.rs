use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::models::AuthenticatedUser;
use crate::features::downloads::dtos::{DownloadFileQuery, DownloadHistoryEntryDto};
use crate::features::downloads::services::DownloadService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Download an artifact's file (or one specific version's file)
///
/// Each successful download is recorded in the caller's history.
#[utoipa::path(
    post,
    path = "/api/downloads/file",
    params(DownloadFileQuery),
    responses(
        (status = 200, description = "File content streamed as an attachment"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Artifact, version or file not found")
    ),
    tag = "downloads",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    user: AuthenticatedUser,
    State(service): State<Arc<DownloadService>>,
    Query(query): Query<DownloadFileQuery>,
) -> Result<Response> {
    let payload = service
        .download(user.id, query.artifact_id, query.version_id)
        .await?;

    // Quotes would break the Content-Disposition header value.
    let file_name = payload.display_name.replace('"', "");

    Response::builder()
        .header(header::CONTENT_TYPE, payload.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(payload.data))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}

/// The caller's download history, newest first
#[utoipa::path(
    get,
    path = "/api/downloads/history",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Download history", body = ApiResponse<Vec<DownloadHistoryEntryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "downloads",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_history(
    user: AuthenticatedUser,
    State(service): State<Arc<DownloadService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<DownloadHistoryEntryDto>>>> {
    let (entries, total) = service.history(user.id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(entries),
        None,
        Some(Meta { total }),
    )))
}
