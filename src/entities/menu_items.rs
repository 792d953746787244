use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{ItemStatus, Lifecycle};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in VND. Whole currency units, no sub-unit.
    pub price: i64,
    pub prep_time_minutes: i32,
    pub status: ItemStatus,
    pub is_chef_recommended: bool,
    pub display_order: i32,
    pub lifecycle: Lifecycle,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu_categories::Entity",
        from = "Column::CategoryId",
        to = "super::menu_categories::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    MenuCategories,
    #[sea_orm(has_many = "super::menu_item_photos::Entity")]
    MenuItemPhotos,
    #[sea_orm(has_many = "super::menu_item_modifiers::Entity")]
    MenuItemModifiers,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::menu_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuCategories.def()
    }
}

impl Related<super::menu_item_photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItemPhotos.def()
    }
}

impl Related<super::menu_item_modifiers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItemModifiers.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
