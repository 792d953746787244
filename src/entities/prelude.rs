pub use super::enums::{CategoryStatus, ItemStatus, Lifecycle, SelectionType};
pub use super::menu_categories::Entity as MenuCategories;
pub use super::menu_item_modifiers::Entity as MenuItemModifiers;
pub use super::menu_item_photos::Entity as MenuItemPhotos;
pub use super::menu_items::Entity as MenuItems;
pub use super::modifier_groups::Entity as ModifierGroups;
pub use super::modifier_options::Entity as ModifierOptions;
pub use super::order_items::Entity as OrderItems;
