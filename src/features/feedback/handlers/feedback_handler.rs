use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::feedback::dtos::{FeedbackSummaryDto, SubmitFeedbackDto};
use crate::features::feedback::services::FeedbackService;
use crate::shared::types::ApiResponse;

/// Submit feedback for an artifact
///
/// A second submission by the same user replaces the earlier rating.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = SubmitFeedbackDto,
    responses(
        (status = 200, description = "Feedback submitted"),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Artifact not found")
    ),
    tag = "feedback",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit_feedback(
    user: AuthenticatedUser,
    State(service): State<Arc<FeedbackService>>,
    AppJson(dto): AppJson<SubmitFeedbackDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.submit(user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Feedback submitted.".to_string()),
        None,
    )))
}

/// Get aggregated feedback for an artifact
#[utoipa::path(
    get,
    path = "/api/feedback/{artifact_id}",
    params(
        ("artifact_id" = i32, Path, description = "Artifact id")
    ),
    responses(
        (status = 200, description = "Feedback summary", body = ApiResponse<FeedbackSummaryDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "feedback",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_feedback(
    State(service): State<Arc<FeedbackService>>,
    Path(artifact_id): Path<i32>,
) -> Result<Json<ApiResponse<FeedbackSummaryDto>>> {
    let summary = service.get_for_artifact(artifact_id).await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
