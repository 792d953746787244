use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    CreateModifierGroupRequest, ModifierGroupResponse, ModifierGroupService,
    UpdateModifierGroupRequest,
};

/// Client-assigned ids with this prefix mark groups that do not exist yet
pub const TEMP_ID_PREFIX: &str = "temp-";

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct BulkGroupEntry {
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub group: CreateModifierGroupRequest,
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct BulkSaveRequest {
    #[validate(nested)]
    pub groups: Vec<BulkGroupEntry>,
}

impl ModifierGroupService {
    /// Reconciles the restaurant's whole modifier group set against the
    /// submitted list in one transaction: `temp-` ids are created, known ids
    /// are updated, and groups missing from the list are deleted. Any group
    /// that cannot be deleted (still attached to a menu item) rolls the whole
    /// save back and its name is reported to the caller.
    pub async fn bulk_save(
        db: &DatabaseConnection,
        restaurant_id: &str,
        input: &BulkSaveRequest,
    ) -> Result<Vec<ModifierGroupResponse>, AppError> {
        input.validate().map_err(AppError::from)?;
        for entry in &input.groups {
            Self::validate_selection_rules(
                entry.group.selection_type,
                entry.group.min_selections,
                entry.group.max_selections,
            )?;
        }

        let txn = db.begin().await?;

        let existing_ids: HashSet<String> = ModifierGroups::find()
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
            .all(&txn)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();

        let incoming_ids: HashSet<&str> = input
            .groups
            .iter()
            .filter(|e| !e.id.starts_with(TEMP_ID_PREFIX))
            .map(|e| e.id.as_str())
            .collect();

        // Delete first so a renamed group cannot collide with its own
        // replacement
        let mut delete_errors: Vec<String> = Vec::new();
        for id in existing_ids.iter().filter(|id| !incoming_ids.contains(id.as_str())) {
            let group = ModifierGroups::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::Internal("Group disappeared mid-save".to_string()))?;

            let links = MenuItemModifiers::find()
                .filter(menu_item_modifiers::Column::ModifierGroupId.eq(id))
                .count(&txn)
                .await?;
            if links > 0 {
                delete_errors.push(format!(
                    "{}: attached to {} menu item(s)",
                    group.name, links
                ));
                continue;
            }

            Self::delete(&txn, id, restaurant_id).await?;
        }

        if !delete_errors.is_empty() {
            txn.rollback().await?;
            delete_errors.sort();
            return Err(AppError::ConflictDetailed {
                message: "Some modifier groups could not be deleted".to_string(),
                errors: delete_errors,
            });
        }

        let mut saved = Vec::with_capacity(input.groups.len());
        for entry in &input.groups {
            let response = if entry.id.starts_with(TEMP_ID_PREFIX) {
                Self::create(&txn, restaurant_id, &entry.group).await?
            } else {
                if !existing_ids.contains(&entry.id) {
                    txn.rollback().await?;
                    return Err(AppError::BadRequest(format!(
                        "MODIFIER_GROUP_NOT_FOUND: Modifier group '{}' does not exist",
                        entry.id
                    )));
                }
                let update = UpdateModifierGroupRequest {
                    name: Some(entry.group.name.clone()),
                    description: entry.group.description.clone(),
                    is_required: Some(entry.group.is_required),
                    min_selections: Some(entry.group.min_selections),
                    max_selections: Some(entry.group.max_selections),
                    selection_type: Some(entry.group.selection_type),
                    display_order: Some(entry.group.display_order),
                    status: Some(entry.group.status),
                    options: Some(entry.group.options.clone()),
                };
                Self::update(&txn, &entry.id, restaurant_id, &update).await?
            };
            saved.push(response);
        }

        txn.commit().await?;
        Ok(saved)
    }
}
