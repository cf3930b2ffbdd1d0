use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::artifacts::dtos::{
    ArtifactResponseDto, ArtifactSearchQuery, ArtifactVersionDto, CreateArtifactDto,
    CreateArtifactVersionDto,
};
use crate::features::artifacts::services::ArtifactService;
use crate::features::auth::models::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta};

/// Search artifacts by combined criteria
///
/// Supports free-text search, per-field filters, paging and sorting.
#[utoipa::path(
    get,
    path = "/api/artifacts",
    params(ArtifactSearchQuery),
    responses(
        (status = 200, description = "Matching artifacts", body = ApiResponse<Vec<ArtifactResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_artifacts(
    State(service): State<Arc<ArtifactService>>,
    Query(query): Query<ArtifactSearchQuery>,
) -> Result<Json<ApiResponse<Vec<ArtifactResponseDto>>>> {
    let (artifacts, total) = service.search(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(artifacts),
        None,
        Some(Meta { total }),
    )))
}

/// Get artifact by id
#[utoipa::path(
    get,
    path = "/api/artifacts/{id}",
    params(
        ("id" = i32, Path, description = "Artifact id")
    ),
    responses(
        (status = 200, description = "Artifact found", body = ApiResponse<ArtifactResponseDto>),
        (status = 404, description = "Artifact not found")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_artifact(
    State(service): State<Arc<ArtifactService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ArtifactResponseDto>>> {
    let artifact = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(artifact), None, None)))
}

/// Create a new artifact
#[utoipa::path(
    post,
    path = "/api/artifacts",
    request_body = CreateArtifactDto,
    responses(
        (status = 201, description = "Artifact created", body = ApiResponse<ArtifactResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_artifact(
    user: AuthenticatedUser,
    State(service): State<Arc<ArtifactService>>,
    AppJson(dto): AppJson<CreateArtifactDto>,
) -> Result<(StatusCode, Json<ApiResponse<ArtifactResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let artifact = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(artifact), None, None)),
    ))
}

/// Delete an artifact
#[utoipa::path(
    delete,
    path = "/api/artifacts/{id}",
    params(
        ("id" = i32, Path, description = "Artifact id")
    ),
    responses(
        (status = 204, description = "Artifact deleted"),
        (status = 404, description = "Artifact not found")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_artifact(
    State(service): State<Arc<ArtifactService>>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a version to an artifact
#[utoipa::path(
    post,
    path = "/api/artifacts/{id}/versions",
    params(
        ("id" = i32, Path, description = "Artifact id")
    ),
    request_body = CreateArtifactVersionDto,
    responses(
        (status = 200, description = "Version added", body = ApiResponse<ArtifactVersionDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Artifact not found")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_artifact_version(
    State(service): State<Arc<ArtifactService>>,
    Path(id): Path<i32>,
    AppJson(dto): AppJson<CreateArtifactVersionDto>,
) -> Result<Json<ApiResponse<ArtifactVersionDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let version = service.add_version(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(version), None, None)))
}

/// Get an artifact's version history, newest first
#[utoipa::path(
    get,
    path = "/api/artifacts/{id}/versions",
    params(
        ("id" = i32, Path, description = "Artifact id")
    ),
    responses(
        (status = 200, description = "Version history", body = ApiResponse<Vec<ArtifactVersionDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "artifacts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_artifact_versions(
    State(service): State<Arc<ArtifactService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ArtifactVersionDto>>>> {
    let versions = service.version_history(id).await?;
    Ok(Json(ApiResponse::success(Some(versions), None, None)))
}
