use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::artifacts::models::{Artifact, ArtifactVersion};
use crate::features::downloads::dtos::DownloadHistoryEntryDto;
use crate::features::downloads::models::DownloadHistory;
use crate::modules::storage::ObjectStore;
use crate::shared::types::PaginationQuery;

/// Resolved file content handed back to the download handler
pub struct DownloadPayload {
    pub data: Vec<u8>,
    pub display_name: String,
    pub content_type: String,
}

/// Service for versioned downloads and download history
pub struct DownloadService {
    pool: PgPool,
    store: Arc<ObjectStore>,
}

impl DownloadService {
    pub fn new(pool: PgPool, store: Arc<ObjectStore>) -> Self {
        Self { pool, store }
    }

    /// Fetch an artifact's file (or one specific version's file), logging the
    /// download for the calling user.
    pub async fn download(
        &self,
        user_id: i32,
        artifact_id: i32,
        version_id: Option<i32>,
    ) -> Result<DownloadPayload> {
        let artifact = sqlx::query_as::<_, Artifact>(
            r#"
            SELECT id, title, description, url, artifact_type, created, author, version,
                   programming_language, framework, license_type, category_id, uploader_id
            FROM artifacts
            WHERE id = $1
            "#,
        )
        .bind(artifact_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Artifact not found.".to_string()))?;

        let (file_key, display_name) = match version_id {
            Some(vid) => {
                let version = sqlx::query_as::<_, ArtifactVersion>(
                    r#"
                    SELECT id, artifact_id, version_number, changes, download_url, upload_date
                    FROM artifact_versions
                    WHERE id = $1 AND artifact_id = $2
                    "#,
                )
                .bind(vid)
                .bind(artifact_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Version not found.".to_string()))?;

                (
                    version.download_url,
                    format!("{}_v{}", artifact.title, version.version_number),
                )
            }
            None => (artifact.url, artifact.title),
        };

        if !self.store.exists(&file_key).await? {
            return Err(AppError::NotFound("File not found on server.".to_string()));
        }

        let history = sqlx::query_as::<_, DownloadHistory>(
            r#"
            INSERT INTO download_history (user_id, artifact_id, version_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, artifact_id, version_id, timestamp
            "#,
        )
        .bind(user_id)
        .bind(artifact_id)
        .bind(version_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to log download: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Download logged: id={}, user={}, artifact={}, version={:?}",
            history.id,
            user_id,
            artifact_id,
            version_id
        );

        let data = self.store.download(&file_key).await?;

        // Uploaded files carry their MIME type in the metadata table; fall
        // back to a generic stream when the key predates it.
        let content_type = sqlx::query_scalar::<_, String>(
            "SELECT content_type FROM files WHERE file_key = $1",
        )
        .bind(&file_key)
        .fetch_optional(&self.pool)
        .await?
        .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(DownloadPayload {
            data,
            display_name,
            content_type,
        })
    }

    /// The calling user's download history, newest first
    pub async fn history(
        &self,
        user_id: i32,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<DownloadHistoryEntryDto>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM download_history WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT d.id, d.artifact_id, a.title AS artifact_title,
                   d.version_id, v.version_number, d.timestamp
            FROM download_history d
            JOIN artifacts a ON a.id = d.artifact_id
            LEFT JOIN artifact_versions v ON v.id = d.version_id
            WHERE d.user_id = $1
            ORDER BY d.timestamp DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load download history: {:?}", e);
            AppError::Database(e)
        })?;

        let entries = entries
            .into_iter()
            .map(|row| DownloadHistoryEntryDto {
                id: row.id,
                artifact_id: row.artifact_id,
                artifact_title: row.artifact_title,
                version_id: row.version_id,
                version_number: row.version_number,
                timestamp: row.timestamp,
            })
            .collect();

        Ok((entries, total))
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i32,
    artifact_id: i32,
    artifact_title: String,
    version_id: Option<i32>,
    version_number: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
}
