use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Options are replaced wholesale when their group is updated, so they carry
/// no lifecycle flag of their own.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "modifier_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub modifier_group_id: String,
    pub name: String,
    /// Amount added to the item price when selected. Never negative.
    pub price_adjustment: i64,
    pub is_default: bool,
    pub display_order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modifier_groups::Entity",
        from = "Column::ModifierGroupId",
        to = "super::modifier_groups::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ModifierGroups,
}

impl Related<super::modifier_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModifierGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
