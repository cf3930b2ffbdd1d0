use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, RearrangeCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all categories as a flat list
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Get the category tree with the caller's expand/collapse state merged in
#[utoipa::path(
    get,
    path = "/api/categories/tree",
    responses(
        (status = 200, description = "Category tree", body = ApiResponse<Vec<CategoryTreeDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_category_tree(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryTreeDto>>>> {
    let tree = service.tree_for_user(user.id).await?;
    Ok(Json(ApiResponse::success(Some(tree), None, None)))
}

/// Get a single category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category under the given parent (or as a root)
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Rename a category
///
/// The request body is the new name as a raw JSON string.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    request_body = String,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rename_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
    AppJson(new_name): AppJson<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.rename(id, &new_name).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete an empty category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category is not empty"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a category to a new parent and/or position
#[utoipa::path(
    post,
    path = "/api/categories/rearrange",
    request_body = RearrangeCategoryDto,
    responses(
        (status = 200, description = "Category rearranged"),
        (status = 400, description = "Position out of range"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Move would create a cycle")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rearrange_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<RearrangeCategoryDto>,
) -> Result<Json<ApiResponse<()>>> {
    service
        .rearrange(dto.category_id, dto.new_parent_id, dto.new_position)
        .await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category rearranged.".to_string()),
        None,
    )))
}

/// Save the caller's expand/collapse preference for a category
///
/// The request body is the expanded flag as a raw JSON boolean.
#[utoipa::path(
    post,
    path = "/api/categories/{id}/display",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    request_body = bool,
    responses(
        (status = 200, description = "Preference saved"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_display_preference(
    user: AuthenticatedUser,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i32>,
    AppJson(is_expanded): AppJson<bool>,
) -> Result<Json<ApiResponse<()>>> {
    service.set_display_preference(id, user.id, is_expanded).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Preference saved.".to_string()),
        None,
    )))
}
