use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join rows between menu items and modifier groups. These are the only rows
/// deleted physically during attachment reconciliation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_item_modifiers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub menu_item_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub modifier_group_id: String,
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu_items::Entity",
        from = "Column::MenuItemId",
        to = "super::menu_items::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    MenuItems,
    #[sea_orm(
        belongs_to = "super::modifier_groups::Entity",
        from = "Column::ModifierGroupId",
        to = "super::modifier_groups::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    ModifierGroups,
}

impl Related<super::menu_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl Related<super::modifier_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModifierGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
