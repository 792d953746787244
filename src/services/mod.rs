pub mod category_service;
pub mod guest_menu_service;
pub mod menu_item_service;
pub mod modifier_service;
pub mod photo_service;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sort direction accepted by every listing endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn into_order(self) -> sea_orm::Order {
        match self {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}
