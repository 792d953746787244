pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::photo_service::PhotoService;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::categories::create_category,
        api::handlers::categories::list_categories,
        api::handlers::categories::get_category,
        api::handlers::categories::update_category,
        api::handlers::categories::update_category_status,
        api::handlers::categories::delete_category,
        api::handlers::menu_items::create_menu_item,
        api::handlers::menu_items::list_menu_items,
        api::handlers::menu_items::get_menu_item,
        api::handlers::menu_items::update_menu_item,
        api::handlers::menu_items::update_menu_item_status,
        api::handlers::menu_items::delete_menu_item,
        api::handlers::photos::upload_photos,
        api::handlers::photos::list_photos,
        api::handlers::photos::delete_photo,
        api::handlers::photos::set_primary_photo,
        api::handlers::modifier_groups::create_modifier_group,
        api::handlers::modifier_groups::list_modifier_groups,
        api::handlers::modifier_groups::get_modifier_group,
        api::handlers::modifier_groups::update_modifier_group,
        api::handlers::modifier_groups::delete_modifier_group,
        api::handlers::modifier_groups::bulk_save_modifier_groups,
        api::handlers::modifier_groups::attach_modifiers,
        api::handlers::modifier_groups::list_item_modifiers,
        api::handlers::guest_menu::get_guest_menu,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            services::category_service::CreateCategoryRequest,
            services::category_service::UpdateCategoryRequest,
            services::category_service::CategoryResponse,
            services::menu_item_service::CreateMenuItemRequest,
            services::menu_item_service::UpdateMenuItemRequest,
            services::menu_item_service::MenuItemResponse,
            services::photo_service::PhotoResponse,
            services::modifier_service::CreateModifierGroupRequest,
            services::modifier_service::UpdateModifierGroupRequest,
            services::modifier_service::ModifierOptionInput,
            services::modifier_service::ModifierGroupResponse,
            services::modifier_service::ModifierOptionResponse,
            services::modifier_service::AttachModifiersRequest,
            services::modifier_service::BulkSaveRequest,
            services::modifier_service::BulkGroupEntry,
            services::guest_menu_service::GuestMenuResponse,
            services::guest_menu_service::GuestMenuCategory,
            services::guest_menu_service::GuestMenuItem,
            api::handlers::categories::UpdateCategoryStatusRequest,
            api::handlers::menu_items::UpdateItemStatusRequest,
            api::handlers::health::HealthResponse,
            entities::CategoryStatus,
            entities::ItemStatus,
            entities::SelectionType,
        )
    ),
    tags(
        (name = "categories", description = "Menu category administration"),
        (name = "menu-items", description = "Menu item administration"),
        (name = "photos", description = "Menu item photo management"),
        (name = "modifier-groups", description = "Modifier group administration"),
        (name = "guest", description = "Diner-facing menu"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub photo_service: Arc<PhotoService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/menu/categories",
            post(api::handlers::categories::create_category)
                .get(api::handlers::categories::list_categories),
        )
        .route(
            "/menu/categories/:id",
            get(api::handlers::categories::get_category)
                .put(api::handlers::categories::update_category)
                .delete(api::handlers::categories::delete_category),
        )
        .route(
            "/menu/categories/:id/status",
            patch(api::handlers::categories::update_category_status),
        )
        .route(
            "/menu/items",
            post(api::handlers::menu_items::create_menu_item)
                .get(api::handlers::menu_items::list_menu_items),
        )
        .route(
            "/menu/items/:id",
            get(api::handlers::menu_items::get_menu_item)
                .put(api::handlers::menu_items::update_menu_item)
                .delete(api::handlers::menu_items::delete_menu_item),
        )
        .route(
            "/menu/items/:id/status",
            patch(api::handlers::menu_items::update_menu_item_status),
        )
        .route(
            "/menu/items/:id/photos",
            post(api::handlers::photos::upload_photos)
                .get(api::handlers::photos::list_photos)
                .layer(axum::extract::DefaultBodyLimit::max(
                    state.config.max_upload_size + 10 * 1024 * 1024, // multipart overhead buffer
                )),
        )
        .route(
            "/menu/items/:id/photos/:photo_id",
            delete(api::handlers::photos::delete_photo),
        )
        .route(
            "/menu/items/:id/photos/:photo_id/primary",
            patch(api::handlers::photos::set_primary_photo),
        )
        .route(
            "/menu/items/:id/modifiers",
            post(api::handlers::modifier_groups::attach_modifiers)
                .get(api::handlers::modifier_groups::list_item_modifiers),
        )
        .route(
            "/menu/modifier-groups",
            post(api::handlers::modifier_groups::create_modifier_group)
                .get(api::handlers::modifier_groups::list_modifier_groups),
        )
        .route(
            "/menu/modifier-groups/bulk",
            post(api::handlers::modifier_groups::bulk_save_modifier_groups),
        )
        .route(
            "/menu/modifier-groups/:id",
            get(api::handlers::modifier_groups::get_modifier_group)
                .put(api::handlers::modifier_groups::update_modifier_group)
                .delete(api::handlers::modifier_groups::delete_modifier_group),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            api::middleware::restaurant::restaurant_middleware,
        ));

    let public = Router::new()
        .route("/menu", get(api::handlers::guest_menu::get_guest_menu))
        .route("/health", get(api::handlers::health::health_check));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/admin", admin)
        .nest("/api", public)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
