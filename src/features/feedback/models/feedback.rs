use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a user's rating of an artifact
///
/// One row per (user_id, artifact_id) pair; resubmitting replaces the rating.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct ArtifactFeedback {
    pub id: i32,
    pub user_id: i32,
    pub artifact_id: i32,
    pub rating: i32,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}
