use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::artifacts::dtos::{
    ArtifactResponseDto, ArtifactSearchQuery, ArtifactVersionDto, CreateArtifactDto,
    CreateArtifactVersionDto,
};
use crate::features::artifacts::models::{Artifact, ArtifactVersion};
use crate::features::auth::models::AuthenticatedUser;

const ARTIFACT_COLUMNS: &str = "id, title, description, url, artifact_type, created, author, \
                                version, programming_language, framework, license_type, \
                                category_id, uploader_id";

/// Service for artifact catalog operations
pub struct ArtifactService {
    pool: PgPool,
}

impl ArtifactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Search artifacts by combined criteria, returning the page and the
    /// total match count.
    pub async fn search(
        &self,
        query: &ArtifactSearchQuery,
    ) -> Result<(Vec<ArtifactResponseDto>, i64)> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM artifacts WHERE 1=1");
        Self::push_filters(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count artifacts: {:?}", e);
                AppError::Database(e)
            })?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM artifacts WHERE 1=1", ARTIFACT_COLUMNS));
        Self::push_filters(&mut builder, query);

        builder.push(format!(
            " ORDER BY {} {}",
            query.sort_column(),
            if query.sort_descending { "DESC" } else { "ASC" }
        ));
        builder.push(" LIMIT ");
        builder.push_bind(query.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let artifacts = builder
            .build_query_as::<Artifact>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search artifacts: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((artifacts.into_iter().map(|a| a.into()).collect(), total))
    }

    /// Get artifact by id
    pub async fn get(&self, id: i32) -> Result<ArtifactResponseDto> {
        self.find(id)
            .await?
            .map(|a| a.into())
            .ok_or_else(|| AppError::NotFound(format!("Artifact {} not found", id)))
    }

    /// Create an artifact; author and uploader come from the caller
    pub async fn create(
        &self,
        dto: CreateArtifactDto,
        user: &AuthenticatedUser,
    ) -> Result<ArtifactResponseDto> {
        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(dto.category_id)
        .fetch_one(&self.pool)
        .await?;

        if !category_exists {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                dto.category_id
            )));
        }

        let artifact = sqlx::query_as::<_, Artifact>(&format!(
            r#"
            INSERT INTO artifacts
                (title, description, url, artifact_type, author, version,
                 programming_language, framework, license_type, category_id, uploader_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ARTIFACT_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.url)
        .bind(dto.artifact_type)
        .bind(&user.username)
        .bind(&dto.version)
        .bind(&dto.programming_language)
        .bind(&dto.framework)
        .bind(&dto.license_type)
        .bind(dto.category_id)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create artifact: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Artifact created: id={}, title={}, uploader={}",
            artifact.id,
            artifact.title,
            user.username
        );

        Ok(artifact.into())
    }

    /// Delete an artifact (its versions cascade)
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete artifact: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Artifact {} not found", id)));
        }

        tracing::info!("Artifact deleted: id={}", id);

        Ok(())
    }

    /// Append a version to an artifact's history
    pub async fn add_version(
        &self,
        artifact_id: i32,
        dto: CreateArtifactVersionDto,
    ) -> Result<ArtifactVersionDto> {
        self.find(artifact_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Artifact not found".to_string()))?;

        let version = sqlx::query_as::<_, ArtifactVersion>(
            r#"
            INSERT INTO artifact_versions (artifact_id, version_number, changes, download_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, artifact_id, version_number, changes, download_url, upload_date
            "#,
        )
        .bind(artifact_id)
        .bind(&dto.version_number)
        .bind(&dto.changes)
        .bind(&dto.download_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add artifact version: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Artifact version added: artifact={}, version={}",
            artifact_id,
            version.version_number
        );

        Ok(version.into())
    }

    /// Version history, newest upload first
    pub async fn version_history(&self, artifact_id: i32) -> Result<Vec<ArtifactVersionDto>> {
        let versions = sqlx::query_as::<_, ArtifactVersion>(
            r#"
            SELECT id, artifact_id, version_number, changes, download_url, upload_date
            FROM artifact_versions
            WHERE artifact_id = $1
            ORDER BY upload_date DESC
            "#,
        )
        .bind(artifact_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load version history: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(versions.into_iter().map(|v| v.into()).collect())
    }

    pub(crate) async fn find(&self, id: i32) -> Result<Option<Artifact>> {
        sqlx::query_as::<_, Artifact>(&format!(
            "SELECT {} FROM artifacts WHERE id = $1",
            ARTIFACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load artifact: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Append the WHERE fragments shared by the page and count queries.
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ArtifactSearchQuery) {
        if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            builder.push(" AND (");
            builder.push("title ILIKE ").push_bind(pattern.clone());
            builder.push(" OR description ILIKE ").push_bind(pattern.clone());
            builder.push(" OR author ILIKE ").push_bind(pattern.clone());
            builder
                .push(" OR programming_language ILIKE ")
                .push_bind(pattern.clone());
            builder.push(" OR framework ILIKE ").push_bind(pattern.clone());
            builder.push(" OR license_type ILIKE ").push_bind(pattern.clone());
            builder.push(" OR version ILIKE ").push_bind(pattern);
            builder.push(")");
        }

        if let Some(language) = query.programming_language.as_deref().filter(|s| !s.is_empty()) {
            builder
                .push(" AND programming_language = ")
                .push_bind(language.to_string());
        }

        if let Some(framework) = query.framework.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND framework = ").push_bind(framework.to_string());
        }

        if let Some(license) = query.license_type.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND license_type = ").push_bind(license.to_string());
        }

        if let Some(category_id) = query.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
    }
}
