use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::FileResponseDto;
use crate::features::files::models::StoredFile;
use crate::modules::storage::ObjectStore;

/// Service for file operations
pub struct FileService {
    pool: PgPool,
    store: Arc<ObjectStore>,
}

impl FileService {
    pub fn new(pool: PgPool, store: Arc<ObjectStore>) -> Self {
        Self { pool, store }
    }

    /// Upload a file to storage and save its metadata.
    ///
    /// The returned key is what artifact create/version requests reference.
    pub async fn upload_file(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
        user_id: i32,
    ) -> Result<FileResponseDto> {
        let file_size = data.len() as i64;

        // Key layout: artifacts/{user_id}/{uuid}_{original name}
        let file_key = format!(
            "artifacts/{}/{}_{}",
            user_id,
            Uuid::new_v4(),
            sanitize_filename(original_filename)
        );

        self.store.upload(&file_key, data, content_type).await?;

        debug!("File uploaded to object store: {}", file_key);

        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files (file_key, original_filename, content_type, file_size, uploaded_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, file_key, original_filename, content_type, file_size, uploaded_by, created_at
            "#,
        )
        .bind(&file_key)
        .bind(original_filename)
        .bind(content_type)
        .bind(file_size)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save file metadata: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "File metadata saved: id={}, key={}, size={}",
            file.id, file.file_key, file.file_size
        );

        Ok(file.into())
    }
}

/// Strip path separators and other characters that have no business in an
/// object key.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_keeps_safe_chars() {
        assert_eq!(sanitize_filename("report-v1.2_final.pdf"), "report-v1.2_final.pdf");
    }

    #[test]
    fn test_sanitize_filename_replaces_separators() {
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename("my file (1).zip"), "my_file__1_.zip");
    }

    #[test]
    fn test_sanitize_filename_empty_fallback() {
        assert_eq!(sanitize_filename(""), "unnamed");
    }
}
