use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SortOrder;
use super::menu_item_service::MenuItemResponse;
use super::modifier_service::{ModifierGroupResponse, ModifierGroupService};

#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GuestSortBy {
    #[default]
    Name,
    Price,
    CreatedAt,
    DisplayOrder,
    ChefFirst,
}

#[derive(Deserialize, ToSchema)]
pub struct GuestMenuQuery {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub is_chef_recommended: Option<bool>,
    pub sort_by: Option<GuestSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Serialize, ToSchema)]
pub struct GuestMenuItem {
    #[serde(flatten)]
    pub item: MenuItemResponse,
    pub modifier_groups: Vec<ModifierGroupResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct GuestMenuCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub items: Vec<GuestMenuItem>,
}

#[derive(Serialize, ToSchema)]
pub struct GuestMenuResponse {
    pub restaurant_name: String,
    pub categories: Vec<GuestMenuCategory>,
}

pub struct GuestMenuService;

impl GuestMenuService {
    /// The diner-facing menu: active categories in display order, each with
    /// its available items and their modifier groups. Categories left with no
    /// visible items are dropped from the response.
    pub async fn get_menu<C: ConnectionTrait>(
        db: &C,
        query: &GuestMenuQuery,
    ) -> Result<GuestMenuResponse, AppError> {
        let sort_by = query.sort_by.unwrap_or_default();
        let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);

        let categories = MenuCategories::find()
            .filter(menu_categories::Column::Status.eq(CategoryStatus::Active))
            .filter(menu_categories::Column::Lifecycle.eq(Lifecycle::Active))
            .order_by_asc(menu_categories::Column::DisplayOrder)
            .all(db)
            .await?;

        let mut cond = Condition::all()
            .add(menu_items::Column::Status.eq(ItemStatus::Available))
            .add(menu_items::Column::Lifecycle.eq(Lifecycle::Active));
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(
                Expr::expr(Func::lower(Expr::col(menu_items::Column::Name)))
                    .like(format!("%{}%", search.to_lowercase())),
            );
        }
        if let Some(category_id) = &query.category_id {
            cond = cond.add(menu_items::Column::CategoryId.eq(category_id));
        }
        if let Some(chef) = query.is_chef_recommended {
            cond = cond.add(menu_items::Column::IsChefRecommended.eq(chef));
        }

        let mut items_query = MenuItems::find().filter(cond);
        items_query = match sort_by {
            // Chef-first sorts in memory below
            GuestSortBy::ChefFirst | GuestSortBy::Name => {
                items_query.order_by(menu_items::Column::Name, sort_order.into_order())
            }
            GuestSortBy::Price => {
                items_query.order_by(menu_items::Column::Price, sort_order.into_order())
            }
            GuestSortBy::CreatedAt => {
                items_query.order_by(menu_items::Column::CreatedAt, sort_order.into_order())
            }
            GuestSortBy::DisplayOrder => {
                items_query.order_by(menu_items::Column::DisplayOrder, sort_order.into_order())
            }
        };
        let mut items = items_query.all(db).await?;

        if matches!(sort_by, GuestSortBy::ChefFirst) {
            items.sort_by(|a, b| {
                (!a.is_chef_recommended, a.name.to_lowercase())
                    .cmp(&(!b.is_chef_recommended, b.name.to_lowercase()))
            });
        }

        let mut result_categories = Vec::with_capacity(categories.len());
        for category in categories {
            let mut guest_items = Vec::new();
            for item in items.iter().filter(|i| i.category_id == category.id) {
                let photos = item
                    .find_related(MenuItemPhotos)
                    .order_by_asc(menu_item_photos::Column::DisplayOrder)
                    .all(db)
                    .await?;
                let modifier_groups =
                    ModifierGroupService::get_by_menu_item(db, &item.id).await?;
                guest_items.push(GuestMenuItem {
                    item: MenuItemResponse::from_parts(
                        item.clone(),
                        Some(category.name.clone()),
                        photos,
                    ),
                    modifier_groups,
                });
            }

            if guest_items.is_empty() {
                continue;
            }

            result_categories.push(GuestMenuCategory {
                id: category.id,
                name: category.name,
                description: category.description,
                display_order: category.display_order,
                items: guest_items,
            });
        }

        Ok(GuestMenuResponse {
            restaurant_name: "Smart Restaurant".to_string(),
            categories: result_categories,
        })
    }
}
