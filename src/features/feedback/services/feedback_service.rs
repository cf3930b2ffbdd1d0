use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::feedback::dtos::{FeedbackEntryDto, FeedbackSummaryDto, SubmitFeedbackDto};
use crate::features::feedback::models::ArtifactFeedback;

/// Mean of the given ratings; 0.0 when no feedback exists yet.
fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|&r| r as f64).sum::<f64>() / ratings.len() as f64
}

/// Service for artifact feedback
pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit feedback for an artifact.
    ///
    /// A user rates an artifact at most once; resubmitting replaces the
    /// previous rating and comment.
    pub async fn submit(&self, user_id: i32, dto: SubmitFeedbackDto) -> Result<()> {
        let artifact_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM artifacts WHERE id = $1)",
        )
        .bind(dto.artifact_id)
        .fetch_one(&self.pool)
        .await?;

        if !artifact_exists {
            return Err(AppError::NotFound(format!(
                "Artifact {} not found",
                dto.artifact_id
            )));
        }

        let feedback = sqlx::query_as::<_, ArtifactFeedback>(
            r#"
            INSERT INTO artifact_feedback (user_id, artifact_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, artifact_id)
            DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, timestamp = NOW()
            RETURNING id, user_id, artifact_id, rating, comment, timestamp
            "#,
        )
        .bind(user_id)
        .bind(dto.artifact_id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to submit feedback: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Feedback submitted: id={}, user={}, artifact={}, rating={}",
            feedback.id,
            user_id,
            dto.artifact_id,
            feedback.rating
        );

        Ok(())
    }

    /// Aggregate feedback for one artifact, newest entry first
    pub async fn get_for_artifact(&self, artifact_id: i32) -> Result<FeedbackSummaryDto> {
        let entries = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT f.rating, f.comment, f.timestamp, u.username
            FROM artifact_feedback f
            JOIN users u ON u.id = f.user_id
            WHERE f.artifact_id = $1
            ORDER BY f.timestamp DESC
            "#,
        )
        .bind(artifact_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load feedback: {:?}", e);
            AppError::Database(e)
        })?;

        let ratings: Vec<i32> = entries.iter().map(|e| e.rating).collect();

        Ok(FeedbackSummaryDto {
            average_rating: average_rating(&ratings),
            count: entries.len() as i64,
            feedbacks: entries
                .into_iter()
                .map(|e| FeedbackEntryDto {
                    rating: e.rating,
                    comment: e.comment,
                    timestamp: e.timestamp,
                    username: e.username,
                })
                .collect(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    rating: i32,
    comment: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating_empty_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_average_rating_single() {
        assert_eq!(average_rating(&[4]), 4.0);
    }

    #[test]
    fn test_average_rating_mixed() {
        let avg = average_rating(&[1, 2, 3, 4, 5]);
        assert!((avg - 3.0).abs() < f64::EPSILON);

        let avg = average_rating(&[4, 5]);
        assert!((avg - 4.5).abs() < f64::EPSILON);
    }
}
