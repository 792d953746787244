use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use menu_backend::config::AppConfig;
use menu_backend::infrastructure::{database, storage};
use menu_backend::services::photo_service::PhotoService;
use menu_backend::{AppState, create_app};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_app() -> (Router, DatabaseConnection, tempfile::TempDir) {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: dir.path().to_string_lossy().into_owned(),
        ..AppConfig::default()
    };
    let store = storage::setup_storage(&config.upload_dir).await.unwrap();
    let state = AppState {
        db: db.clone(),
        photo_service: Arc::new(PhotoService::new(db.clone(), store, config.clone())),
        config,
    };

    (create_app(state), db, dir)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn send_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn create_category(app: &Router, name: &str, display_order: i32) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": name, "display_order": display_order}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_item(app: &Router, payload: Value) -> String {
    let (status, body) = send_json(app, "POST", "/api/admin/menu/items", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_guest_menu_groups_items_under_categories() {
    let (app, _db, _dir) = setup_app().await;

    let starters = create_category(&app, "Starters", 0).await;
    let mains = create_category(&app, "Mains", 1).await;
    create_item(
        &app,
        json!({"name": "Spring Rolls", "category_id": starters, "price": 45_000}),
    )
    .await;
    create_item(
        &app,
        json!({"name": "Beef Pho", "category_id": mains, "price": 85_000}),
    )
    .await;

    let (status, body) = send_get(&app, "/api/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["restaurant_name"], json!("Smart Restaurant"));

    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["name"], json!("Starters"));
    assert_eq!(categories[1]["name"], json!("Mains"));
    assert_eq!(categories[0]["items"][0]["name"], json!("Spring Rolls"));
    assert_eq!(
        categories[1]["items"][0]["price_formatted"],
        json!("85.000đ")
    );
}

#[tokio::test]
async fn test_guest_menu_hides_unavailable_and_inactive() {
    let (app, _db, _dir) = setup_app().await;

    let visible = create_category(&app, "Visible", 0).await;
    let hidden = create_category(&app, "Hidden", 1).await;
    create_item(
        &app,
        json!({"name": "Shown Dish", "category_id": visible, "price": 60_000}),
    )
    .await;
    let sold_out = create_item(
        &app,
        json!({"name": "Gone Dish", "category_id": visible, "price": 60_000}),
    )
    .await;
    create_item(
        &app,
        json!({"name": "Backstage Dish", "category_id": hidden, "price": 60_000}),
    )
    .await;

    send_json(
        &app,
        "PATCH",
        &format!("/api/admin/menu/items/{}/status", sold_out),
        json!({"status": "sold_out"}),
    )
    .await;
    send_json(
        &app,
        "PATCH",
        &format!("/api/admin/menu/categories/{}/status", hidden),
        json!({"status": "inactive"}),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu").await;
    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], json!("Visible"));
    let items = categories[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], json!("Shown Dish"));
}

#[tokio::test]
async fn test_guest_menu_omits_empty_categories() {
    let (app, _db, _dir) = setup_app().await;

    create_category(&app, "Empty Shelf", 0).await;
    let stocked = create_category(&app, "Stocked", 1).await;
    create_item(
        &app,
        json!({"name": "Only Dish", "category_id": stocked, "price": 30_000}),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu").await;
    let categories = body["data"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], json!("Stocked"));
}

#[tokio::test]
async fn test_guest_menu_includes_modifier_groups() {
    let (app, _db, _dir) = setup_app().await;

    let category = create_category(&app, "Bowls", 0).await;
    let item = create_item(
        &app,
        json!({"name": "Poke Bowl", "category_id": category, "price": 99_000}),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/modifier-groups",
        json!({
            "name": "Size",
            "is_required": true,
            "min_selections": 1,
            "max_selections": 1,
            "options": [
                {"name": "Regular", "is_default": true},
                {"name": "Large", "price_adjustment": 20_000}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group = body["data"]["id"].as_str().unwrap().to_string();

    send_json(
        &app,
        "POST",
        &format!("/api/admin/menu/items/{}/modifiers", item),
        json!({"modifier_group_ids": [group]}),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu").await;
    let menu_item = &body["data"]["categories"][0]["items"][0];
    let groups = menu_item["modifier_groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["name"], json!("Size"));
    assert_eq!(groups[0]["is_required"], json!(true));
    let options = groups[0]["options"].as_array().unwrap();
    assert_eq!(options[0]["is_default"], json!(true));
    assert_eq!(options[1]["price_adjustment"], json!(20_000));
}

#[tokio::test]
async fn test_guest_menu_search_and_chef_filter() {
    let (app, _db, _dir) = setup_app().await;

    let category = create_category(&app, "Grill", 0).await;
    create_item(
        &app,
        json!({
            "name": "Charcoal Chicken",
            "category_id": category,
            "price": 120_000,
            "is_chef_recommended": true
        }),
    )
    .await;
    create_item(
        &app,
        json!({"name": "Grilled Squid", "category_id": category, "price": 150_000}),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu?search=chicken").await;
    let items = body["data"]["categories"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], json!("Charcoal Chicken"));

    let (_, body) = send_get(&app, "/api/menu?is_chef_recommended=true").await;
    let items = body["data"]["categories"][0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["is_chef_recommended"], json!(true));
}

#[tokio::test]
async fn test_guest_menu_chef_first_sort() {
    let (app, _db, _dir) = setup_app().await;

    let category = create_category(&app, "All Day", 0).await;
    create_item(
        &app,
        json!({"name": "Avocado Toast", "category_id": category, "price": 70_000}),
    )
    .await;
    create_item(
        &app,
        json!({
            "name": "Zesty Ribs",
            "category_id": category,
            "price": 190_000,
            "is_chef_recommended": true
        }),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu?sort_by=chef_first").await;
    let items = body["data"]["categories"][0]["items"].as_array().unwrap();
    // Chef picks lead even when alphabetically last
    assert_eq!(items[0]["name"], json!("Zesty Ribs"));
    assert_eq!(items[1]["name"], json!("Avocado Toast"));
}

#[tokio::test]
async fn test_guest_menu_price_sort() {
    let (app, _db, _dir) = setup_app().await;

    let category = create_category(&app, "Sweets", 0).await;
    create_item(
        &app,
        json!({"name": "Flan", "category_id": category, "price": 25_000}),
    )
    .await;
    create_item(
        &app,
        json!({"name": "Che Thai", "category_id": category, "price": 35_000}),
    )
    .await;

    let (_, body) = send_get(&app, "/api/menu?sort_by=price&sort_order=desc").await;
    let items = body["data"]["categories"][0]["items"].as_array().unwrap();
    assert_eq!(items[0]["name"], json!("Che Thai"));
    assert_eq!(items[1]["name"], json!("Flan"));
}
