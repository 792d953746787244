use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{CategoryStatus, Lifecycle, SelectionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "modifier_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_required: bool,
    /// Invariant: min_selections <= max_selections, and for
    /// `SelectionType::Single` max_selections <= 1.
    pub min_selections: i32,
    pub max_selections: i32,
    pub selection_type: SelectionType,
    pub display_order: i32,
    pub status: CategoryStatus,
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::modifier_options::Entity")]
    ModifierOptions,
    #[sea_orm(has_many = "super::menu_item_modifiers::Entity")]
    MenuItemModifiers,
}

impl Related<super::modifier_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModifierOptions.def()
    }
}

impl Related<super::menu_item_modifiers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItemModifiers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
