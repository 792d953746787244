use crate::AppState;
use crate::api::error::AppError;
use crate::api::response::{ApiResponse, MessageResponse};
use crate::entities::CategoryStatus;
use crate::services::SortOrder;
use crate::services::category_service::{
    CategoryResponse, CategorySortBy, CategoryService, CreateCategoryRequest,
    UpdateCategoryRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema)]
pub struct CategoryListQuery {
    pub sort_by: Option<CategorySortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCategoryStatusRequest {
    pub status: CategoryStatus,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Validation failed or duplicate name")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let category = CategoryService::create(&state.db, &payload).await?;
    let response = CategoryResponse::from_model(category, 0);
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/categories",
    responses(
        (status = 200, description = "All live categories with item counts")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sort_by = query.sort_by.unwrap_or_default();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);

    let categories = CategoryService::list(&state.db, sort_by, sort_order).await?;
    let data: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|(model, count)| CategoryResponse::from_model(model, count))
        .collect();
    Ok(Json(ApiResponse::new(data)))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category detail"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = CategoryService::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    let count = CategoryService::item_count(&state.db, &category.id).await?;
    Ok(Json(ApiResponse::new(CategoryResponse::from_model(
        category, count,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let category = CategoryService::update(&state.db, &id, &payload).await?;
    let count = CategoryService::item_count(&state.db, &category.id).await?;
    Ok(Json(ApiResponse::new(CategoryResponse::from_model(
        category, count,
    ))))
}

#[utoipa::path(
    patch,
    path = "/api/admin/menu/categories/{id}/status",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = CategoryService::update_status(&state.db, &id, payload.status).await?;
    let count = CategoryService::item_count(&state.db, &category.id).await?;
    Ok(Json(ApiResponse::new(CategoryResponse::from_model(
        category, count,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still has menu items"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    CategoryService::delete(&state.db, &id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
