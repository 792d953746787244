use crate::AppState;
use crate::api::error::AppError;
use crate::api::response::{ApiResponse, MessageResponse};
use crate::services::photo_service::{PhotoResponse, UploadedPhoto};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/api/admin/menu/items/{id}/photos",
    params(("id" = String, Path, description = "Menu item id")),
    request_body(content = Vec<u8>, description = "One or more photo files in the `photos` field", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photos uploaded"),
        (status = 400, description = "Rejected file type or content"),
        (status = 404, description = "Menu item not found"),
        (status = 413, description = "File exceeds the size limit")
    ),
    tag = "photos"
)]
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut files: Vec<UploadedPhoto> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        // The body limit trips inside the multipart reader, not at the route
        if e.to_string().contains("length limit exceeded") {
            AppError::PayloadTooLarge("File exceeds the upload size limit".to_string())
        } else {
            AppError::BadRequest(format!("Invalid multipart request: {}", e))
        }
    })? {
        if field.name() != Some("photos") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|c| c.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| {
                if e.to_string().contains("length limit exceeded") {
                    AppError::PayloadTooLarge("File exceeds the upload size limit".to_string())
                } else {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                }
            })?
            .to_vec();

        files.push(UploadedPhoto {
            filename,
            content_type,
            data,
        });
    }

    let created = state.photo_service.upload(&id, files).await?;
    let data: Vec<PhotoResponse> = created.into_iter().map(PhotoResponse::from_model).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::new(data))))
}

#[utoipa::path(
    get,
    path = "/api/admin/menu/items/{id}/photos",
    params(("id" = String, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Photos in display order")
    ),
    tag = "photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let photos = state.photo_service.list(&id).await?;
    let data: Vec<PhotoResponse> = photos.into_iter().map(PhotoResponse::from_model).collect();
    Ok(Json(ApiResponse::new(data)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/menu/items/{id}/photos/{photo_id}",
    params(
        ("id" = String, Path, description = "Menu item id"),
        ("photo_id" = String, Path, description = "Photo id")
    ),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.photo_service.delete(&id, &photo_id).await?;
    Ok(Json(MessageResponse::new("Photo deleted successfully")))
}

#[utoipa::path(
    patch,
    path = "/api/admin/menu/items/{id}/photos/{photo_id}/primary",
    params(
        ("id" = String, Path, description = "Menu item id"),
        ("photo_id" = String, Path, description = "Photo id")
    ),
    responses(
        (status = 200, description = "Primary photo set"),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn set_primary_photo(
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.photo_service.set_primary(&id, &photo_id).await?;
    Ok(Json(MessageResponse::new("Primary photo updated")))
}
