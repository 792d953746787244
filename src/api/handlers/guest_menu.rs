use crate::AppState;
use crate::api::error::AppError;
use crate::api::response::ApiResponse;
use crate::services::guest_menu_service::{GuestMenuQuery, GuestMenuService};
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Diner-facing menu grouped by category")
    ),
    tag = "guest"
)]
pub async fn get_guest_menu(
    State(state): State<AppState>,
    Query(query): Query<GuestMenuQuery>,
) -> Result<impl IntoResponse, AppError> {
    let menu = GuestMenuService::get_menu(&state.db, &query).await?;
    Ok(Json(ApiResponse::new(menu)))
}
