use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::{ModifierGroupResponse, ModifierGroupService};

#[derive(Clone, Deserialize, ToSchema)]
pub struct AttachModifiersRequest {
    pub modifier_group_ids: Vec<String>,
    /// Optional explicit ordering per group id; positional order is used
    /// for groups not listed here
    pub display_orders: Option<HashMap<String, i32>>,
}

impl ModifierGroupService {
    /// Replaces the item's modifier group links with the given set. Runs
    /// inside a transaction so readers never observe a half-attached item.
    pub async fn attach_to_menu_item<C: ConnectionTrait>(
        db: &C,
        menu_item_id: &str,
        restaurant_id: &str,
        input: &AttachModifiersRequest,
    ) -> Result<(), AppError> {
        use sea_orm::PaginatorTrait;

        let item_exists = MenuItems::find_by_id(menu_item_id)
            .filter(menu_items::Column::Lifecycle.eq(Lifecycle::Active))
            .count(db)
            .await?
            > 0;
        if !item_exists {
            return Err(AppError::NotFound(
                "MENU_ITEM_NOT_FOUND: Menu item does not exist".to_string(),
            ));
        }

        // Every referenced group must exist, belong to the restaurant, and
        // be live before any link is touched
        for group_id in &input.modifier_group_ids {
            let exists = ModifierGroups::find_by_id(group_id)
                .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
                .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
                .count(db)
                .await?
                > 0;
            if !exists {
                return Err(AppError::BadRequest(format!(
                    "MODIFIER_GROUP_NOT_FOUND: Modifier group '{}' does not exist",
                    group_id
                )));
            }
        }

        MenuItemModifiers::delete_many()
            .filter(menu_item_modifiers::Column::MenuItemId.eq(menu_item_id))
            .exec(db)
            .await?;

        if input.modifier_group_ids.is_empty() {
            return Ok(());
        }

        let links: Vec<menu_item_modifiers::ActiveModel> = input
            .modifier_group_ids
            .iter()
            .enumerate()
            .map(|(index, group_id)| menu_item_modifiers::ActiveModel {
                menu_item_id: Set(menu_item_id.to_string()),
                modifier_group_id: Set(group_id.clone()),
                display_order: Set(input
                    .display_orders
                    .as_ref()
                    .and_then(|orders| orders.get(group_id).copied())
                    .unwrap_or(index as i32)),
            })
            .collect();

        MenuItemModifiers::insert_many(links).exec(db).await?;
        Ok(())
    }

    /// Groups attached to an item, in link display order
    pub async fn get_by_menu_item<C: ConnectionTrait>(
        db: &C,
        menu_item_id: &str,
    ) -> Result<Vec<ModifierGroupResponse>, AppError> {
        let links = MenuItemModifiers::find()
            .filter(menu_item_modifiers::Column::MenuItemId.eq(menu_item_id))
            .order_by_asc(menu_item_modifiers::Column::DisplayOrder)
            .all(db)
            .await?;

        let mut result = Vec::with_capacity(links.len());
        for link in links {
            let group = ModifierGroups::find_by_id(&link.modifier_group_id)
                .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
                .one(db)
                .await?;
            if let Some(group) = group {
                let options = Self::options_for(db, &group.id).await?;
                result.push(ModifierGroupResponse::from_parts(group, options));
            }
        }
        Ok(result)
    }
}
