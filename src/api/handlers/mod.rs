pub mod categories;
pub mod guest_menu;
pub mod health;
pub mod menu_items;
pub mod modifier_groups;
pub mod photos;
