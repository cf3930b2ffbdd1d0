use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::StoredFile;

/// Multipart form schema for the upload endpoint (documentation only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(value_type = String, format = Binary)]
    #[allow(dead_code)]
    pub file: String,
}

/// Response DTO for an uploaded file
///
/// `file_key` is what artifact create/version requests reference as their
/// `url` / `downloadUrl`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    pub id: Uuid,
    pub file_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileResponseDto {
    fn from(f: StoredFile) -> Self {
        Self {
            id: f.id,
            file_key: f.file_key,
            original_filename: f.original_filename,
            content_type: f.content_type,
            file_size: f.file_size,
            created_at: f.created_at,
        }
    }
}
