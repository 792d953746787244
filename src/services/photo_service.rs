use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{prelude::*, *};
use crate::infrastructure::storage::PhotoStore;
use crate::utils::validation::{
    validate_photo_content, validate_photo_extension, validate_photo_mime, validate_photo_size,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, ToSchema)]
pub struct PhotoResponse {
    pub id: String,
    pub url: String,
    pub is_primary: bool,
    pub display_order: i32,
    pub created_at: chrono::DateTime<Utc>,
}

impl PhotoResponse {
    pub fn from_model(model: menu_item_photos::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            is_primary: model.is_primary,
            display_order: model.display_order,
            created_at: model.created_at,
        }
    }
}

/// One file lifted out of the multipart request
#[derive(Validate)]
pub struct UploadedPhoto {
    #[validate(length(min = 1, message = "Filename cannot be empty"))]
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

pub struct PhotoService {
    db: DatabaseConnection,
    storage: Arc<dyn PhotoStore>,
    config: AppConfig,
}

impl PhotoService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn PhotoStore>, config: AppConfig) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    /// Uploads a batch of photos for one item. Each file is validated before
    /// anything is written; a failure after the write removes that file and
    /// aborts the remaining batch.
    pub async fn upload(
        &self,
        menu_item_id: &str,
        files: Vec<UploadedPhoto>,
    ) -> Result<Vec<menu_item_photos::Model>, AppError> {
        self.assert_item_exists(menu_item_id).await?;

        if files.is_empty() {
            return Err(AppError::BadRequest("No photos provided".to_string()));
        }

        let existing = MenuItemPhotos::find()
            .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
            .all(&self.db)
            .await?;
        let has_primary = existing.iter().any(|p| p.is_primary);
        let current_count = existing.len() as i32;

        let mut created: Vec<menu_item_photos::Model> = Vec::with_capacity(files.len());

        for (index, file) in files.into_iter().enumerate() {
            file.validate().map_err(AppError::from)?;
            let ext = validate_photo_extension(&file.filename)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if let Some(content_type) = &file.content_type {
                validate_photo_mime(content_type)
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            validate_photo_size(file.data.len(), self.config.max_upload_size)
                .map_err(|e| AppError::PayloadTooLarge(e.to_string()))?;
            validate_photo_content(&file.data)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            let stored_name = format!("photo-{}-{}{}", menu_item_id, Uuid::new_v4(), ext);
            self.storage
                .save(&stored_name, &file.data)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to store photo: {}", e)))?;

            let photo = menu_item_photos::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                menu_item_id: Set(menu_item_id.to_string()),
                url: Set(format!("{}/uploads/{}", self.config.base_url, stored_name)),
                is_primary: Set(!has_primary && created.is_empty()),
                display_order: Set(current_count + index as i32),
                created_at: Set(Utc::now()),
            };

            match photo.insert(&self.db).await {
                Ok(model) => created.push(model),
                Err(e) => {
                    // Remove the just-written file, then abort the batch
                    if let Err(cleanup) = self.storage.remove(&stored_name).await {
                        tracing::warn!("Could not remove orphaned photo file: {}", cleanup);
                    }
                    return Err(AppError::Database(e));
                }
            }
        }

        Ok(created)
    }

    pub async fn list(&self, menu_item_id: &str) -> Result<Vec<menu_item_photos::Model>, AppError> {
        Ok(MenuItemPhotos::find()
            .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
            .order_by_asc(menu_item_photos::Column::DisplayOrder)
            .all(&self.db)
            .await?)
    }

    /// Deletes a photo. When the primary photo goes away the next photo by
    /// display order is promoted, so an item never ends up with photos but
    /// no primary.
    pub async fn delete(&self, menu_item_id: &str, photo_id: &str) -> Result<(), AppError> {
        let photo = MenuItemPhotos::find_by_id(photo_id)
            .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("PHOTO_NOT_FOUND: Photo does not exist".to_string()))?;

        let was_primary = photo.is_primary;
        let url = photo.url.clone();

        MenuItemPhotos::delete_by_id(photo_id).exec(&self.db).await?;

        if let Some(filename) = url.split("/uploads/").last() {
            if let Err(e) = self.storage.remove(filename).await {
                tracing::warn!("Could not delete photo file from storage: {}", e);
            }
        }

        if was_primary {
            let next = MenuItemPhotos::find()
                .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
                .order_by_asc(menu_item_photos::Column::DisplayOrder)
                .limit(1)
                .one(&self.db)
                .await?;

            if let Some(next) = next {
                let mut active: menu_item_photos::ActiveModel = next.into();
                active.is_primary = Set(true);
                active.update(&self.db).await?;
            }
        }

        Ok(())
    }

    /// Clears the primary flag from every photo of the item, then sets it on
    /// the target. Never leaves two primaries.
    pub async fn set_primary(&self, menu_item_id: &str, photo_id: &str) -> Result<(), AppError> {
        let photo = MenuItemPhotos::find_by_id(photo_id)
            .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("PHOTO_NOT_FOUND: Photo does not exist".to_string()))?;

        MenuItemPhotos::update_many()
            .col_expr(menu_item_photos::Column::IsPrimary, Expr::value(false))
            .filter(menu_item_photos::Column::MenuItemId.eq(menu_item_id))
            .exec(&self.db)
            .await?;

        let mut active: menu_item_photos::ActiveModel = photo.into();
        active.is_primary = Set(true);
        active.update(&self.db).await?;

        Ok(())
    }

    async fn assert_item_exists(&self, menu_item_id: &str) -> Result<(), AppError> {
        use sea_orm::PaginatorTrait;

        let exists = MenuItems::find_by_id(menu_item_id)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .count(&self.db)
            .await?
            > 0;
        if !exists {
            return Err(AppError::NotFound(
                "MENU_ITEM_NOT_FOUND: Menu item does not exist".to_string(),
            ));
        }
        Ok(())
    }
}
