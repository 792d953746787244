mod attach;
mod bulk;

pub use attach::AttachModifiersRequest;
pub use bulk::{BulkGroupEntry, BulkSaveRequest, TEMP_ID_PREFIX};

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

fn default_max_selections() -> i32 {
    1
}

fn default_selection_type() -> SelectionType {
    SelectionType::Single
}

fn default_status() -> CategoryStatus {
    CategoryStatus::Active
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct ModifierOptionInput {
    #[validate(length(min = 1, max = 80, message = "Option name must be between 1 and 80 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Price adjustment must be >= 0"))]
    pub price_adjustment: i64,
    #[serde(default)]
    pub is_default: bool,
    pub display_order: Option<i32>,
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateModifierGroupRequest {
    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    #[validate(range(min = 0, message = "Min selections must be >= 0"))]
    pub min_selections: i32,
    #[serde(default = "default_max_selections")]
    #[validate(range(min = 0, message = "Max selections must be >= 0"))]
    pub max_selections: i32,
    #[serde(default = "default_selection_type")]
    pub selection_type: SelectionType,
    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: i32,
    #[serde(default = "default_status")]
    pub status: CategoryStatus,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<ModifierOptionInput>,
}

#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateModifierGroupRequest {
    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    pub is_required: Option<bool>,
    #[validate(range(min = 0, message = "Min selections must be >= 0"))]
    pub min_selections: Option<i32>,
    #[validate(range(min = 0, message = "Max selections must be >= 0"))]
    pub max_selections: Option<i32>,
    pub selection_type: Option<SelectionType>,
    #[validate(range(min = 0, message = "Display order must be >= 0"))]
    pub display_order: Option<i32>,
    pub status: Option<CategoryStatus>,
    /// When present, the group's options are replaced wholesale
    #[validate(nested)]
    pub options: Option<Vec<ModifierOptionInput>>,
}

#[derive(Serialize, ToSchema)]
pub struct ModifierOptionResponse {
    pub id: String,
    pub name: String,
    pub price_adjustment: i64,
    pub is_default: bool,
    pub display_order: i32,
}

impl ModifierOptionResponse {
    fn from_model(model: modifier_options::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price_adjustment: model.price_adjustment,
            is_default: model.is_default,
            display_order: model.display_order,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ModifierGroupResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_required: bool,
    pub min_selections: i32,
    pub max_selections: i32,
    pub selection_type: SelectionType,
    pub display_order: i32,
    pub status: CategoryStatus,
    pub options: Vec<ModifierOptionResponse>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl ModifierGroupResponse {
    fn from_parts(group: modifier_groups::Model, options: Vec<modifier_options::Model>) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            is_required: group.is_required,
            min_selections: group.min_selections,
            max_selections: group.max_selections,
            selection_type: group.selection_type,
            display_order: group.display_order,
            status: group.status,
            options: options
                .into_iter()
                .map(ModifierOptionResponse::from_model)
                .collect(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

pub struct ModifierGroupService;

impl ModifierGroupService {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        restaurant_id: &str,
        input: &CreateModifierGroupRequest,
    ) -> Result<ModifierGroupResponse, AppError> {
        let name = input.name.trim().to_string();
        Self::assert_name_unique(db, restaurant_id, &name, None).await?;
        Self::validate_selection_rules(
            input.selection_type,
            input.min_selections,
            input.max_selections,
        )?;

        let now = Utc::now();
        let group_id = Uuid::new_v4().to_string();
        let group = modifier_groups::ActiveModel {
            id: Set(group_id.clone()),
            restaurant_id: Set(restaurant_id.to_string()),
            name: Set(name),
            description: Set(input.description.clone()),
            is_required: Set(input.is_required),
            min_selections: Set(input.min_selections),
            max_selections: Set(input.max_selections),
            selection_type: Set(input.selection_type),
            display_order: Set(input.display_order),
            status: Set(input.status),
            lifecycle: Set(Lifecycle::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        group.insert(db).await?;

        Self::insert_options(db, &group_id, &input.options).await?;

        Self::get_by_id(db, &group_id, restaurant_id)
            .await?
            .ok_or_else(|| AppError::Internal("Created group vanished".to_string()))
    }

    pub async fn get_all<C: ConnectionTrait>(
        db: &C,
        restaurant_id: &str,
    ) -> Result<Vec<ModifierGroupResponse>, AppError> {
        let groups = ModifierGroups::find()
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
            .order_by_asc(modifier_groups::Column::DisplayOrder)
            .all(db)
            .await?;

        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            let options = Self::options_for(db, &group.id).await?;
            result.push(ModifierGroupResponse::from_parts(group, options));
        }
        Ok(result)
    }

    pub async fn get_by_id<C: ConnectionTrait>(
        db: &C,
        id: &str,
        restaurant_id: &str,
    ) -> Result<Option<ModifierGroupResponse>, AppError> {
        let group = ModifierGroups::find_by_id(id)
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?;

        match group {
            Some(group) => {
                let options = Self::options_for(db, &group.id).await?;
                Ok(Some(ModifierGroupResponse::from_parts(group, options)))
            }
            None => Ok(None),
        }
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: &str,
        restaurant_id: &str,
        input: &UpdateModifierGroupRequest,
    ) -> Result<ModifierGroupResponse, AppError> {
        let existing = ModifierGroups::find_by_id(id)
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Modifier group not found".to_string()))?;

        if let Some(name) = &input.name {
            Self::assert_name_unique(db, restaurant_id, name.trim(), Some(id)).await?;
        }

        // Selection rules are validated against the merged state
        let min = input.min_selections.unwrap_or(existing.min_selections);
        let max = input.max_selections.unwrap_or(existing.max_selections);
        let selection_type = input.selection_type.unwrap_or(existing.selection_type);
        Self::validate_selection_rules(selection_type, min, max)?;

        let mut active: modifier_groups::ActiveModel = existing.into();
        if let Some(name) = &input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = &input.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(is_required) = input.is_required {
            active.is_required = Set(is_required);
        }
        if let Some(min) = input.min_selections {
            active.min_selections = Set(min);
        }
        if let Some(max) = input.max_selections {
            active.max_selections = Set(max);
        }
        if let Some(selection_type) = input.selection_type {
            active.selection_type = Set(selection_type);
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        // Options are replaced wholesale when supplied
        if let Some(options) = &input.options {
            ModifierOptions::delete_many()
                .filter(modifier_options::Column::ModifierGroupId.eq(id))
                .exec(db)
                .await?;
            Self::insert_options(db, id, options).await?;
        }

        Self::get_by_id(db, id, restaurant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Modifier group not found".to_string()))
    }

    /// Soft delete. Refused while any menu item still links to the group.
    pub async fn delete<C: ConnectionTrait>(
        db: &C,
        id: &str,
        restaurant_id: &str,
    ) -> Result<(), AppError> {
        let existing = ModifierGroups::find_by_id(id)
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Modifier group not found".to_string()))?;

        let links = MenuItemModifiers::find()
            .filter(menu_item_modifiers::Column::ModifierGroupId.eq(id))
            .count(db)
            .await?;
        if links > 0 {
            return Err(AppError::Conflict(format!(
                "GROUP_IN_USE: Modifier group '{}' is attached to {} menu item(s). Detach it first.",
                existing.name, links
            )));
        }

        let mut active: modifier_groups::ActiveModel = existing.into();
        active.lifecycle = Set(Lifecycle::Deleted);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
        Ok(())
    }

    pub fn validate_selection_rules(
        selection_type: SelectionType,
        min_selections: i32,
        max_selections: i32,
    ) -> Result<(), AppError> {
        if selection_type == SelectionType::Single && max_selections > 1 {
            return Err(AppError::BadRequest(
                "INVALID_SELECTION: Single-select groups allow at most 1 selection".to_string(),
            ));
        }
        if min_selections > max_selections {
            return Err(AppError::BadRequest(
                "INVALID_SELECTION: Min selections cannot exceed max selections".to_string(),
            ));
        }
        Ok(())
    }

    async fn insert_options<C: ConnectionTrait>(
        db: &C,
        group_id: &str,
        options: &[ModifierOptionInput],
    ) -> Result<(), AppError> {
        for (index, option) in options.iter().enumerate() {
            let model = modifier_options::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                modifier_group_id: Set(group_id.to_string()),
                name: Set(option.name.trim().to_string()),
                price_adjustment: Set(option.price_adjustment),
                is_default: Set(option.is_default),
                display_order: Set(option.display_order.unwrap_or(index as i32)),
                created_at: Set(Utc::now()),
            };
            model.insert(db).await?;
        }
        Ok(())
    }

    pub(super) async fn options_for<C: ConnectionTrait>(
        db: &C,
        group_id: &str,
    ) -> Result<Vec<modifier_options::Model>, AppError> {
        Ok(ModifierOptions::find()
            .filter(modifier_options::Column::ModifierGroupId.eq(group_id))
            .order_by_asc(modifier_options::Column::DisplayOrder)
            .all(db)
            .await?)
    }

    async fn assert_name_unique<C: ConnectionTrait>(
        db: &C,
        restaurant_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), AppError> {
        let mut query = ModifierGroups::find()
            .filter(modifier_groups::Column::RestaurantId.eq(restaurant_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(modifier_groups::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .filter(modifier_groups::Column::Lifecycle.eq(Lifecycle::Active));

        if let Some(id) = exclude_id {
            query = query.filter(modifier_groups::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            return Err(AppError::Conflict(
                "DUPLICATE_NAME: A modifier group with this name already exists".to_string(),
            ));
        }
        Ok(())
    }
}
