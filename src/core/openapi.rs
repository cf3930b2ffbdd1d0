use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::artifacts::{dtos as artifacts_dtos, handlers as artifacts_handlers};
use crate::features::artifacts::models::ArtifactType;
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, models as auth_models};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::downloads::{dtos as downloads_dtos, handlers as downloads_handlers};
use crate::features::feedback::{dtos as feedback_dtos, handlers as feedback_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::refresh_token,
        auth_handlers::get_me,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category_tree,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::rename_category,
        categories_handlers::delete_category,
        categories_handlers::rearrange_category,
        categories_handlers::set_display_preference,
        // Artifacts
        artifacts_handlers::search_artifacts,
        artifacts_handlers::get_artifact,
        artifacts_handlers::create_artifact,
        artifacts_handlers::delete_artifact,
        artifacts_handlers::add_artifact_version,
        artifacts_handlers::get_artifact_versions,
        // Feedback
        feedback_handlers::submit_feedback,
        feedback_handlers::get_feedback,
        // Downloads
        downloads_handlers::download_file,
        downloads_handlers::download_history,
        // Files
        files_handlers::upload_file,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_models::AuthenticatedUser,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::RefreshTokenRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::AuthUserDto,
            auth_dtos::MeResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::RearrangeCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            // Artifacts
            ArtifactType,
            artifacts_dtos::CreateArtifactDto,
            artifacts_dtos::ArtifactResponseDto,
            artifacts_dtos::CreateArtifactVersionDto,
            artifacts_dtos::ArtifactVersionDto,
            ApiResponse<Vec<artifacts_dtos::ArtifactResponseDto>>,
            ApiResponse<artifacts_dtos::ArtifactResponseDto>,
            ApiResponse<Vec<artifacts_dtos::ArtifactVersionDto>>,
            ApiResponse<artifacts_dtos::ArtifactVersionDto>,
            // Feedback
            feedback_dtos::SubmitFeedbackDto,
            feedback_dtos::FeedbackEntryDto,
            feedback_dtos::FeedbackSummaryDto,
            ApiResponse<feedback_dtos::FeedbackSummaryDto>,
            // Downloads
            downloads_dtos::DownloadHistoryEntryDto,
            ApiResponse<Vec<downloads_dtos::DownloadHistoryEntryDto>>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "categories", description = "Hierarchical artifact categories and per-user display state"),
        (name = "artifacts", description = "Software-development artifact catalog"),
        (name = "feedback", description = "Artifact ratings and comments"),
        (name = "downloads", description = "Versioned downloads and download history"),
        (name = "files", description = "File upload into object storage"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "DevShelf API",
        version = "0.1.0",
        description = "API documentation for DevShelf",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
