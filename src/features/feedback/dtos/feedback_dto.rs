use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request DTO for submitting (or replacing) feedback on an artifact
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackDto {
    pub artifact_id: i32,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i32,

    #[serde(default)]
    pub comment: String,
}

/// One feedback entry as rendered to readers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntryDto {
    pub rating: i32,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

/// Aggregated feedback for one artifact
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummaryDto {
    pub average_rating: f64,
    pub count: i64,
    pub feedbacks: Vec<FeedbackEntryDto>,
}
