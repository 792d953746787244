use crate::AppState;
use crate::api::error::AppError;
use crate::api::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::entities::ItemStatus;
use crate::services::menu_item_service::{
    CreateMenuItemRequest, MenuItemQuery, MenuItemService, UpdateMenuItemRequest,
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
pub struct UpdateItemStatusRequest {
    pub status: ItemStatus,
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/items",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created"),
        (status = 400, description = "Validation failed, unknown category, or duplicate name")
    ),
    tag = "menu-items"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let item = MenuItemService::create(&state.db, &payload).await?;
    let response = MenuItemService::get_by_id(&state.db, &item.id)
        .await?
        .ok_or_else(|| AppError::Internal("Created item vanished".to_string()))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/items",
    responses(
        (status = 200, description = "Paginated menu items")
    ),
    tag = "menu-items"
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(query): Query<MenuItemQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (items, pagination) = MenuItemService::list(&state.db, &query).await?;
    Ok(Json(PaginatedResponse::new(items, pagination)))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/items/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item detail with photos"),
        (status = 404, description = "Menu item not found")
    ),
    tag = "menu-items"
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = MenuItemService::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;
    Ok(Json(ApiResponse::new(item)))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/items/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated"),
        (status = 404, description = "Menu item not found")
    ),
    tag = "menu-items"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let item = MenuItemService::update(&state.db, &id, &payload).await?;
    Ok(Json(ApiResponse::new(item)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/menu/items/{id}/status",
    params(("id" = String, Path, description = "Menu item id")),
    request_body = UpdateItemStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Menu item not found")
    ),
    tag = "menu-items"
)]
pub async fn update_menu_item_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    MenuItemService::update_status(&state.db, &id, payload.status).await?;
    let item = MenuItemService::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;
    Ok(Json(ApiResponse::new(item)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/items/{id}",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found")
    ),
    tag = "menu-items"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    MenuItemService::delete(&state.db, &id).await?;
    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}
