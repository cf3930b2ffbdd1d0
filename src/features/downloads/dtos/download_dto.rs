use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query params for the download endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileQuery {
    pub artifact_id: i32,
    pub version_id: Option<i32>,
}

/// One entry of a user's download history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadHistoryEntryDto {
    pub id: i32,
    pub artifact_id: i32,
    pub artifact_title: String,
    pub version_id: Option<i32>,
    pub version_number: Option<String>,
    pub timestamp: DateTime<Utc>,
}
