use crate::api::error::AppError;
use crate::api::response::Pagination;
use crate::entities::{prelude::*, *};
use crate::services::photo_service::PhotoResponse;
use crate::utils::format::format_price;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::SortOrder;

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub name: String,
    pub category_id: String,
    #[validate(range(min = 1, max = 999_999_999, message = "Price must be a positive amount"))]
    pub price: i64,
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 240, message = "Prep time must be between 0 and 240 minutes"))]
    pub prep_time_minutes: i32,
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub is_chef_recommended: bool,
    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: i32,
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub name: Option<String>,
    pub category_id: Option<String>,
    #[validate(range(min = 1, max = 999_999_999, message = "Price must be a positive amount"))]
    pub price: Option<i64>,
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 240, message = "Prep time must be between 0 and 240 minutes"))]
    pub prep_time_minutes: Option<i32>,
    pub status: Option<ItemStatus>,
    pub is_chef_recommended: Option<bool>,
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemSortBy {
    #[default]
    CreatedAt,
    Price,
    Name,
    Popularity,
}

#[derive(Deserialize, ToSchema)]
pub struct MenuItemQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<ItemStatus>,
    pub sort_by: Option<ItemSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Serialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: String,
    pub category_id: String,
    pub category_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub price_formatted: String,
    pub prep_time_minutes: i32,
    pub status: ItemStatus,
    pub is_chef_recommended: bool,
    pub display_order: i32,
    pub photos: Vec<PhotoResponse>,
    pub primary_photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity_score: Option<u64>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl MenuItemResponse {
    pub fn from_parts(
        item: menu_items::Model,
        category_name: Option<String>,
        photos: Vec<menu_item_photos::Model>,
    ) -> Self {
        let primary_photo_url = photos
            .iter()
            .find(|p| p.is_primary)
            .or_else(|| photos.first())
            .map(|p| p.url.clone());

        Self {
            id: item.id,
            category_id: item.category_id,
            category_name,
            name: item.name,
            description: item.description,
            price: item.price,
            price_formatted: format_price(item.price),
            prep_time_minutes: item.prep_time_minutes,
            status: item.status,
            is_chef_recommended: item.is_chef_recommended,
            display_order: item.display_order,
            photos: photos.into_iter().map(PhotoResponse::from_model).collect(),
            primary_photo_url,
            popularity_score: None,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

pub struct MenuItemService;

impl MenuItemService {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        input: &CreateMenuItemRequest,
    ) -> Result<menu_items::Model, AppError> {
        Self::assert_category_exists(db, &input.category_id).await?;

        let name = input.name.trim().to_string();
        Self::assert_name_unique(db, &name, None).await?;

        let now = Utc::now();
        let item = menu_items::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            category_id: Set(input.category_id.clone()),
            name: Set(name),
            description: Set(input.description.clone()),
            price: Set(input.price),
            prep_time_minutes: Set(input.prep_time_minutes),
            status: Set(input.status.unwrap_or(ItemStatus::Available)),
            is_chef_recommended: Set(input.is_chef_recommended),
            display_order: Set(input.display_order),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(item.insert(db).await?)
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        query: &MenuItemQuery,
    ) -> Result<(Vec<MenuItemResponse>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * limit;
        let sort_by = query.sort_by.unwrap_or_default();
        let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

        let mut cond =
            Condition::all().add(menu_items::Column::Lifecycle.eq(Lifecycle::Active));
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col((
                    menu_items::Entity,
                    menu_items::Column::Name,
                ))))
                .like(format!("%{}%", search.to_lowercase())),
            );
        }
        if let Some(category_id) = &query.category_id {
            cond = cond.add(menu_items::Column::CategoryId.eq(category_id));
        }
        if let Some(status) = query.status {
            cond = cond.add(menu_items::Column::Status.eq(status));
        }

        let total = MenuItems::find().filter(cond.clone()).count(db).await?;
        let pagination = Pagination::new(page, limit, total);

        // Popularity requires a full fetch: the score lives in order_items
        // and the sort happens in memory before the page is sliced out.
        if matches!(sort_by, ItemSortBy::Popularity) {
            let rows = MenuItems::find()
                .find_also_related(MenuCategories)
                .filter(cond)
                .all(db)
                .await?;

            let scores = Self::popularity_scores(db, &rows).await?;

            let mut responses = Vec::with_capacity(rows.len());
            for (item, category) in rows {
                let score = scores.get(&item.id).copied().unwrap_or(0);
                let photos = Self::photos_for(db, &item).await?;
                let mut response =
                    MenuItemResponse::from_parts(item, category.map(|c| c.name), photos);
                response.popularity_score = Some(score);
                responses.push(response);
            }

            responses.sort_by(|a, b| {
                let ordering = a
                    .popularity_score
                    .cmp(&b.popularity_score)
                    .then(a.created_at.cmp(&b.created_at));
                match sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });

            let page_items = responses
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            return Ok((page_items, pagination));
        }

        let column = match sort_by {
            ItemSortBy::CreatedAt | ItemSortBy::Popularity => menu_items::Column::CreatedAt,
            ItemSortBy::Price => menu_items::Column::Price,
            ItemSortBy::Name => menu_items::Column::Name,
        };

        let rows = MenuItems::find()
            .find_also_related(MenuCategories)
            .filter(cond)
            .order_by(column, sort_order.into_order())
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;

        let mut responses = Vec::with_capacity(rows.len());
        for (item, category) in rows {
            let photos = Self::photos_for(db, &item).await?;
            responses.push(MenuItemResponse::from_parts(
                item,
                category.map(|c| c.name),
                photos,
            ));
        }

        Ok((responses, pagination))
    }

    pub async fn get_by_id<C: ConnectionTrait>(
        db: &C,
        id: &str,
    ) -> Result<Option<MenuItemResponse>, AppError> {
        let row = MenuItems::find_by_id(id)
            .find_also_related(MenuCategories)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?;

        match row {
            Some((item, category)) => {
                let photos = Self::photos_for(db, &item).await?;
                Ok(Some(MenuItemResponse::from_parts(
                    item,
                    category.map(|c| c.name),
                    photos,
                )))
            }
            None => Ok(None),
        }
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: &str,
        input: &UpdateMenuItemRequest,
    ) -> Result<MenuItemResponse, AppError> {
        let existing = MenuItems::find_by_id(id)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;

        if let Some(category_id) = &input.category_id {
            Self::assert_category_exists(db, category_id).await?;
        }
        if let Some(name) = &input.name {
            Self::assert_name_unique(db, name.trim(), Some(id)).await?;
        }

        let mut active: menu_items::ActiveModel = existing.into();
        if let Some(name) = &input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(category_id) = &input.category_id {
            active.category_id = Set(category_id.clone());
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(description) = &input.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(prep_time) = input.prep_time_minutes {
            active.prep_time_minutes = Set(prep_time);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(chef) = input.is_chef_recommended {
            active.is_chef_recommended = Set(chef);
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        Self::get_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
    }

    /// Fast path: flips only the status field, skipping the full payload
    pub async fn update_status<C: ConnectionTrait>(
        db: &C,
        id: &str,
        status: ItemStatus,
    ) -> Result<menu_items::Model, AppError> {
        let existing = MenuItems::find_by_id(id)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;

        let mut active: menu_items::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Soft delete. Always allowed; the row stays behind for order history.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<(), AppError> {
        let existing = MenuItems::find_by_id(id)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;

        let mut active: menu_items::ActiveModel = existing.into();
        active.lifecycle = Set(Lifecycle::Deleted);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    async fn photos_for<C: ConnectionTrait>(
        db: &C,
        item: &menu_items::Model,
    ) -> Result<Vec<menu_item_photos::Model>, AppError> {
        Ok(item
            .find_related(MenuItemPhotos)
            .order_by_asc(menu_item_photos::Column::DisplayOrder)
            .all(db)
            .await?)
    }

    async fn popularity_scores<C: ConnectionTrait>(
        db: &C,
        rows: &[(menu_items::Model, Option<menu_categories::Model>)],
    ) -> Result<HashMap<String, u64>, AppError> {
        let ids: Vec<&str> = rows.iter().map(|(item, _)| item.id.as_str()).collect();
        let mut scores: HashMap<String, u64> = HashMap::new();
        if ids.is_empty() {
            return Ok(scores);
        }

        let order_lines = OrderItems::find()
            .filter(order_items::Column::MenuItemId.is_in(ids))
            .all(db)
            .await?;
        for line in order_lines {
            *scores.entry(line.menu_item_id).or_insert(0) += 1;
        }
        Ok(scores)
    }

    async fn assert_category_exists<C: ConnectionTrait>(
        db: &C,
        category_id: &str,
    ) -> Result<(), AppError> {
        let exists = MenuCategories::find_by_id(category_id)
            .filter(menu_categories::Column::Lifecycle.eq(Lifecycle::Active))
            .count(db)
            .await?
            > 0;
        if !exists {
            return Err(AppError::BadRequest(
                "CATEGORY_NOT_FOUND: Category does not exist".to_string(),
            ));
        }
        Ok(())
    }

    async fn assert_name_unique<C: ConnectionTrait>(
        db: &C,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), AppError> {
        let mut query = MenuItems::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(menu_items::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active));

        if let Some(id) = exclude_id {
            query = query.filter(menu_items::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            return Err(AppError::Conflict(
                "DUPLICATE_NAME: A menu item with this name already exists".to_string(),
            ));
        }
        Ok(())
    }
}
