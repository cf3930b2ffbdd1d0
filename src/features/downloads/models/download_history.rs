use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for one logged download
///
/// `version_id` is set when a specific artifact version was fetched rather
/// than the artifact's primary file.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct DownloadHistory {
    pub id: i32,
    pub user_id: i32,
    pub artifact_id: i32,
    pub version_id: Option<i32>,
    pub timestamp: DateTime<Utc>,
}
