use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Kind of development artifact stored in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "artifact_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    Library,
    Documentation,
    Tool,
    Tutorial,
    Sample,
}

/// Database model for a software-development artifact
#[derive(Debug, Clone, FromRow)]
pub struct Artifact {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Object-store key of the artifact's primary file
    pub url: String,
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

/// Database model for one released version of an artifact
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactVersion {
    pub id: i32,
    pub artifact_id: i32,
    pub version_number: String,
    pub changes: String,
    /// Object-store key of this version's file
    pub download_url: String,
    pub upload_date: DateTime<Utc>,
}
