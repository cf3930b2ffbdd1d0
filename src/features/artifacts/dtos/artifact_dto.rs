use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::artifacts::models::{Artifact, ArtifactType, ArtifactVersion};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::validation::VERSION_REGEX;

/// Request DTO for creating an artifact
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactDto {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    /// Object-store key returned by the file upload endpoint
    #[validate(length(min = 1, message = "Url is required"))]
    pub url: String,

    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    #[validate(regex(
        path = *VERSION_REGEX,
        message = "Invalid version format. Use semantic versioning (e.g. 1.0.0)."
    ))]
    pub version: String,

    #[validate(length(min = 2, message = "Programming language must be at least 2 characters"))]
    pub programming_language: String,

    #[validate(length(min = 2, message = "Framework must be at least 2 characters"))]
    pub framework: String,

    #[validate(length(min = 1, message = "License type is required"))]
    pub license_type: String,

    #[validate(range(min = 1, message = "CategoryId must be a positive integer"))]
    pub category_id: i32,
}

/// Response DTO for an artifact
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResponseDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    pub created: DateTime<Utc>,
    pub author: String,
    pub version: String,
    pub programming_language: String,
    pub framework: String,
    pub license_type: String,
    pub category_id: i32,
    pub uploader_id: i32,
}

impl From<Artifact> for ArtifactResponseDto {
    fn from(a: Artifact) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            url: a.url,
            artifact_type: a.artifact_type,
            created: a.created,
            author: a.author,
            version: a.version,
            programming_language: a.programming_language,
            framework: a.framework,
            license_type: a.license_type,
            category_id: a.category_id,
            uploader_id: a.uploader_id,
        }
    }
}

/// Request DTO for appending a version to an artifact
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactVersionDto {
    #[validate(regex(
        path = *VERSION_REGEX,
        message = "Invalid version format. Use semantic versioning (e.g. 1.0.0)."
    ))]
    pub version_number: String,

    pub changes: String,

    /// Object-store key returned by the file upload endpoint
    #[validate(length(min = 1, message = "DownloadUrl is required"))]
    pub download_url: String,
}

/// Response DTO for an artifact version
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactVersionDto {
    pub id: i32,
    pub artifact_id: i32,
    pub version_number: String,
    pub changes: String,
    pub download_url: String,
    pub upload_date: DateTime<Utc>,
}

impl From<ArtifactVersion> for ArtifactVersionDto {
    fn from(v: ArtifactVersion) -> Self {
        Self {
            id: v.id,
            artifact_id: v.artifact_id,
            version_number: v.version_number,
            changes: v.changes,
            download_url: v.download_url,
            upload_date: v.upload_date,
        }
    }
}

/// Combined search criteria for the artifact listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSearchQuery {
    /// Free-text term matched against title, description, author, language,
    /// framework, license and version
    pub search_term: Option<String>,

    pub programming_language: Option<String>,
    pub framework: Option<String>,
    pub license_type: Option<String>,
    pub category_id: Option<i32>,

    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page_number")]
    #[param(minimum = 1)]
    pub page_number: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Sort key: "created" (default), "title" or "author"
    pub sort_by: Option<String>,

    /// Sort newest/highest first (default: true)
    #[serde(default = "default_sort_descending")]
    pub sort_descending: bool,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_descending() -> bool {
    true
}

impl Default for ArtifactSearchQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            programming_language: None,
            framework: None,
            license_type: None,
            category_id: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_descending: true,
        }
    }
}

impl ArtifactSearchQuery {
    /// Get clamped page size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page_number.max(1) - 1) * self.limit()
    }

    /// Sort column whitelisted for ORDER BY; unknown keys fall back to the
    /// creation timestamp.
    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some("title") => "title",
            Some("author") => "author",
            _ => "created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        let mut query = ArtifactSearchQuery::default();
        assert_eq!(query.sort_column(), "created");

        query.sort_by = Some("title".to_string());
        assert_eq!(query.sort_column(), "title");

        query.sort_by = Some("author".to_string());
        assert_eq!(query.sort_column(), "author");

        // Anything not whitelisted falls back instead of reaching the SQL.
        query.sort_by = Some("id; DROP TABLE artifacts".to_string());
        assert_eq!(query.sort_column(), "created");
    }

    #[test]
    fn test_paging_defaults_and_clamps() {
        let query = ArtifactSearchQuery::default();
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = ArtifactSearchQuery {
            page_number: 4,
            page_size: 25,
            ..Default::default()
        };
        assert_eq!(query.offset(), 75);

        let query = ArtifactSearchQuery {
            page_number: 0,
            page_size: 100_000,
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }
}
