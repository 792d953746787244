pub mod prelude;

pub mod enums;
pub use enums::{CategoryStatus, ItemStatus, Lifecycle, SelectionType};

pub mod menu_categories;
pub mod menu_item_modifiers;
pub mod menu_item_photos;
pub mod menu_items;
pub mod modifier_groups;
pub mod modifier_options;
pub mod order_items;
