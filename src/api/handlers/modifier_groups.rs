use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::restaurant::RestaurantId;
use crate::api::response::{ApiResponse, MessageResponse};
use crate::services::modifier_service::{
    AttachModifiersRequest, BulkSaveRequest, CreateModifierGroupRequest, ModifierGroupService,
    UpdateModifierGroupRequest,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/admin/menu/modifier-groups",
    request_body = CreateModifierGroupRequest,
    responses(
        (status = 201, description = "Modifier group created"),
        (status = 400, description = "Validation failed, bad selection rules, or duplicate name")
    ),
    tag = "modifier-groups"
)]
pub async fn create_modifier_group(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Json(payload): Json<CreateModifierGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let group = ModifierGroupService::create(&state.db, &restaurant.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(group))))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/modifier-groups",
    responses(
        (status = 200, description = "All live modifier groups with options")
    ),
    tag = "modifier-groups"
)]
pub async fn list_modifier_groups(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
) -> Result<impl IntoResponse, AppError> {
    let groups = ModifierGroupService::get_all(&state.db, &restaurant.0).await?;
    Ok(Json(ApiResponse::new(groups)))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/modifier-groups/{id}",
    params(("id" = String, Path, description = "Modifier group id")),
    responses(
        (status = 200, description = "Modifier group detail"),
        (status = 404, description = "Modifier group not found")
    ),
    tag = "modifier-groups"
)]
pub async fn get_modifier_group(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let group = ModifierGroupService::get_by_id(&state.db, &id, &restaurant.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Modifier group not found".to_string()))?;
    Ok(Json(ApiResponse::new(group)))
}

#[utoipa::path(
    put,
    path = "/api/admin/menu/modifier-groups/{id}",
    params(("id" = String, Path, description = "Modifier group id")),
    request_body = UpdateModifierGroupRequest,
    responses(
        (status = 200, description = "Modifier group updated"),
        (status = 404, description = "Modifier group not found")
    ),
    tag = "modifier-groups"
)]
pub async fn update_modifier_group(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateModifierGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::from)?;

    let group = ModifierGroupService::update(&state.db, &id, &restaurant.0, &payload).await?;
    Ok(Json(ApiResponse::new(group)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/modifier-groups/{id}",
    params(("id" = String, Path, description = "Modifier group id")),
    responses(
        (status = 200, description = "Modifier group deleted"),
        (status = 400, description = "Group still attached to menu items"),
        (status = 404, description = "Modifier group not found")
    ),
    tag = "modifier-groups"
)]
pub async fn delete_modifier_group(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ModifierGroupService::delete(&state.db, &id, &restaurant.0).await?;
    Ok(Json(MessageResponse::new(
        "Modifier group deleted successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/modifier-groups/bulk",
    request_body = BulkSaveRequest,
    responses(
        (status = 200, description = "All groups saved"),
        (status = 400, description = "Save rolled back; blocked deletes listed in `errors`")
    ),
    tag = "modifier-groups"
)]
pub async fn bulk_save_modifier_groups(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Json(payload): Json<BulkSaveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let saved = ModifierGroupService::bulk_save(&state.db, &restaurant.0, &payload).await?;
    Ok(Json(ApiResponse::new(saved)))
}

#[utoipa::path(
    post,
    path = "/api/admin/menu/items/{id}/modifiers",
    params(("id" = String, Path, description = "Menu item id")),
    request_body = AttachModifiersRequest,
    responses(
        (status = 200, description = "Modifier group links replaced"),
        (status = 400, description = "Unknown modifier group"),
        (status = 404, description = "Menu item not found")
    ),
    tag = "modifier-groups"
)]
pub async fn attach_modifiers(
    State(state): State<AppState>,
    Extension(restaurant): Extension<RestaurantId>,
    Path(id): Path<String>,
    Json(payload): Json<AttachModifiersRequest>,
) -> Result<impl IntoResponse, AppError> {
    use sea_orm::TransactionTrait;

    let txn = state.db.begin().await?;
    ModifierGroupService::attach_to_menu_item(&txn, &id, &restaurant.0, &payload).await?;
    txn.commit().await?;

    let groups = ModifierGroupService::get_by_menu_item(&state.db, &id).await?;
    Ok(Json(ApiResponse::new(groups)))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/items/{id}/modifiers",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Groups attached to the item, in link order")
    ),
    tag = "modifier-groups"
)]
pub async fn list_item_modifiers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let groups = ModifierGroupService::get_by_menu_item(&state.db, &id).await?;
    Ok(Json(ApiResponse::new(groups)))
}
