use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::SortOrder;

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: i32,
    pub status: Option<CategoryStatus>,
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: Option<i32>,
    pub status: Option<CategoryStatus>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategorySortBy {
    #[default]
    DisplayOrder,
    Name,
    CreatedAt,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub status: CategoryStatus,
    pub item_count: u64,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl CategoryResponse {
    pub fn from_model(model: menu_categories::Model, item_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            display_order: model.display_order,
            status: model.status,
            item_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct CategoryService;

impl CategoryService {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        input: &CreateCategoryRequest,
    ) -> Result<menu_categories::Model, AppError> {
        let name = input.name.trim().to_string();
        Self::assert_name_unique(db, &name, None).await?;

        let now = Utc::now();
        let category = menu_categories::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            description: Set(input.description.clone()),
            display_order: Set(input.display_order),
            status: Set(input.status.unwrap_or(CategoryStatus::Active)),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(db).await?)
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        sort_by: CategorySortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<(menu_categories::Model, u64)>, AppError> {
        let column = match sort_by {
            CategorySortBy::DisplayOrder => menu_categories::Column::DisplayOrder,
            CategorySortBy::Name => menu_categories::Column::Name,
            CategorySortBy::CreatedAt => menu_categories::Column::CreatedAt,
        };

        let categories = MenuCategories::find()
            .filter(menu_categories::Column::Lifecycle.eq(Lifecycle::Active))
            .order_by(column, sort_order.into_order())
            .all(db)
            .await?;

        let mut result = Vec::with_capacity(categories.len());
        for category in categories {
            let count = Self::item_count(db, &category.id).await?;
            result.push((category, count));
        }
        Ok(result)
    }

    pub async fn get_by_id<C: ConnectionTrait>(
        db: &C,
        id: &str,
    ) -> Result<Option<menu_categories::Model>, AppError> {
        Ok(MenuCategories::find_by_id(id)
            .filter(menu_categories::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?)
    }

    pub async fn item_count<C: ConnectionTrait>(
        db: &C,
        category_id: &str,
    ) -> Result<u64, AppError> {
        Ok(MenuItems::find()
            .filter(menu_items::Column::CategoryId.eq(category_id))
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .count(db)
            .await?)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: &str,
        input: &UpdateCategoryRequest,
    ) -> Result<menu_categories::Model, AppError> {
        let existing = Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        if let Some(name) = &input.name {
            Self::assert_name_unique(db, name.trim(), Some(id)).await?;
        }

        let mut active: menu_categories::ActiveModel = existing.into();
        if let Some(name) = &input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = &input.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Fast path: flips only the status field, skipping the full payload
    pub async fn update_status<C: ConnectionTrait>(
        db: &C,
        id: &str,
        status: CategoryStatus,
    ) -> Result<menu_categories::Model, AppError> {
        let existing = Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let mut active: menu_categories::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Soft delete. Refused while any non-deleted item still references the
    /// category; the row is left untouched in that case.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<(), AppError> {
        let existing = Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let items = Self::item_count(db, id).await?;
        if items > 0 {
            return Err(AppError::Conflict(format!(
                "CATEGORY_NOT_EMPTY: Category '{}' still contains {} menu item(s). Move or delete them first.",
                existing.name, items
            )));
        }

        let mut active: menu_categories::ActiveModel = existing.into();
        active.lifecycle = Set(Lifecycle::Deleted);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    async fn assert_name_unique<C: ConnectionTrait>(
        db: &C,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), AppError> {
        let mut query = MenuCategories::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(menu_categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .filter(menu_categories::Column::Lifecycle.eq(Lifecycle::Active));

        if let Some(id) = exclude_id {
            query = query.filter(menu_categories::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            return Err(AppError::Conflict(
                "DUPLICATE_NAME: A category with this name already exists".to_string(),
            ));
        }
        Ok(())
    }
}
