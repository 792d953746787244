use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use menu_backend::config::AppConfig;
use menu_backend::entities::prelude::*;
use menu_backend::entities::{Lifecycle, order_items};
use menu_backend::infrastructure::{database, storage};
use menu_backend::services::photo_service::PhotoService;
use menu_backend::{AppState, create_app};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, EntityTrait,
};
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

async fn create_category(app: &Router, name: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": name}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_item(app: &Router, category_id: &str, name: &str, price: i64) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/menu/items",
        json!({"name": name, "category_id": category_id, "price": price}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_category_crud_flow() {
    let (app, _db, _dir) = setup_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": "Burgers", "description": "Grilled classics", "display_order": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Burgers"));
    assert_eq!(body["data"]["status"], json!("active"));
    assert_eq!(body["data"]["item_count"], json!(0));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_get(&app, &format!("/api/admin/menu/categories/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], json!("Grilled classics"));

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/admin/menu/categories/{}", id),
        json!({"name": "Smash Burgers", "display_order": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Smash Burgers"));
    assert_eq!(body["data"]["display_order"], json!(1));

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/admin/menu/categories/{}/status", id),
        json!({"status": "inactive"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("inactive"));
}

#[tokio::test]
async fn test_duplicate_category_name_is_case_insensitive() {
    let (app, _db, _dir) = setup_app().await;

    create_category(&app, "Desserts").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": "dEsSeRtS"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("DUPLICATE_NAME")
    );
}

#[tokio::test]
async fn test_category_name_length_is_validated() {
    let (app, _db, _dir) = setup_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": "X"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Validation failed"));
    assert!(body["errors"].as_array().unwrap().len() == 1);
}

#[tokio::test]
async fn test_delete_category_blocked_while_items_remain() {
    let (app, db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Mains").await;
    create_item(&app, &category_id, "Classic Burger", 129_900).await;

    let (status, body) = send_json(
        &app,
        "DELETE",
        &format!("/api/admin/menu/categories/{}", category_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("CATEGORY_NOT_EMPTY")
    );

    // Still visible after the refused delete
    let (status, _) = send_get(&app, &format!("/api/admin/menu/categories/{}", category_id)).await;
    assert_eq!(status, StatusCode::OK);

    let row = MenuCategories::find_by_id(&category_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.lifecycle, Lifecycle::Active);
}

#[tokio::test]
async fn test_deleted_category_row_survives_as_tombstone() {
    let (app, db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Seasonal").await;

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/admin/menu/categories/{}", category_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_get(&app, &format!("/api/admin/menu/categories/{}", category_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The row is flipped, not removed
    let row = MenuCategories::find_by_id(&category_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.lifecycle, Lifecycle::Deleted);

    // The name is free for reuse
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/admin/menu/categories",
        json!({"name": "Seasonal"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_menu_item_create_formats_price() {
    let (app, _db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Burgers").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/items",
        json!({
            "name": "Classic Burger",
            "category_id": category_id,
            "price": 129_900,
            "prep_time_minutes": 15,
            "is_chef_recommended": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["price"], json!(129_900));
    assert_eq!(body["data"]["price_formatted"], json!("129.900đ"));
    assert_eq!(body["data"]["category_name"], json!("Burgers"));
    assert_eq!(body["data"]["status"], json!("available"));
    assert_eq!(body["data"]["is_chef_recommended"], json!(true));
}

#[tokio::test]
async fn test_menu_item_rejects_unknown_category() {
    let (app, _db, _dir) = setup_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/admin/menu/items",
        json!({"name": "Orphan Dish", "category_id": "nope", "price": 50_000}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("CATEGORY_NOT_FOUND")
    );
}

#[tokio::test]
async fn test_menu_item_list_paginates_and_searches() {
    let (app, _db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Noodles").await;
    for i in 1..=12 {
        create_item(&app, &category_id, &format!("Pho Bowl {}", i), 65_000 + i).await;
    }
    create_item(&app, &category_id, "Bun Cha", 55_000).await;

    let (status, body) = send_get(&app, "/api/admin/menu/items?page=2&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["page"], json!(2));
    assert_eq!(body["pagination"]["total"], json!(13));
    assert_eq!(body["pagination"]["total_pages"], json!(3));

    let (status, body) = send_get(&app, "/api/admin/menu/items?search=pho").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], json!(12));

    let (status, body) =
        send_get(&app, "/api/admin/menu/items?search=bun%20cha&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], json!("Bun Cha"));
}

#[tokio::test]
async fn test_menu_item_sort_by_price() {
    let (app, _db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Drinks").await;
    create_item(&app, &category_id, "Iced Tea", 25_000).await;
    create_item(&app, &category_id, "Coconut Coffee", 65_000).await;
    create_item(&app, &category_id, "Lime Soda", 40_000).await;

    let (status, body) =
        send_get(&app, "/api/admin/menu/items?sort_by=price&sort_order=asc").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Iced Tea", "Lime Soda", "Coconut Coffee"]);
}

#[tokio::test]
async fn test_menu_item_sort_by_popularity() {
    let (app, db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Rice").await;
    let quiet = create_item(&app, &category_id, "Plain Rice", 20_000).await;
    let hit = create_item(&app, &category_id, "Broken Rice Special", 75_000).await;

    for i in 0..3 {
        let line = order_items::ActiveModel {
            id: Set(format!("order-line-{}", i)),
            menu_item_id: Set(hit.clone()),
            created_at: Set(chrono::Utc::now()),
        };
        line.insert(&db).await.unwrap();
    }

    let (status, body) =
        send_get(&app, "/api/admin/menu/items?sort_by=popularity&sort_order=desc").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items[0]["id"].as_str().unwrap(), hit);
    assert_eq!(items[0]["popularity_score"], json!(3));
    assert_eq!(items[1]["id"].as_str().unwrap(), quiet);
    assert_eq!(items[1]["popularity_score"], json!(0));
}

#[tokio::test]
async fn test_menu_item_status_fast_path_and_soft_delete() {
    let (app, db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Soups").await;
    let item_id = create_item(&app, &category_id, "Crab Soup", 45_000).await;

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/admin/menu/items/{}/status", item_id),
        json!({"status": "sold_out"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("sold_out"));

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/admin/menu/items/{}", item_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_get(&app, &format!("/api/admin/menu/items/{}", item_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let row = MenuItems::find_by_id(&item_id).one(&db).await.unwrap().unwrap();
    assert_eq!(row.lifecycle, Lifecycle::Deleted);
}

#[tokio::test]
async fn test_item_count_tracks_live_items_only() {
    let (app, _db, _dir) = setup_app().await;

    let category_id = create_category(&app, "Salads").await;
    let keep = create_item(&app, &category_id, "Green Salad", 40_000).await;
    let drop = create_item(&app, &category_id, "Mango Salad", 50_000).await;

    let (_, body) = send_get(&app, &format!("/api/admin/menu/categories/{}", category_id)).await;
    assert_eq!(body["data"]["item_count"], json!(2));

    send_json(
        &app,
        "DELETE",
        &format!("/api/admin/menu/items/{}", drop),
        json!({}),
    )
    .await;

    let (_, body) = send_get(&app, &format!("/api/admin/menu/categories/{}", category_id)).await;
    assert_eq!(body["data"]["item_count"], json!(1));

    let (status, _) = send_get(&app, &format!("/api/admin/menu/items/{}", keep)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _db, _dir) = setup_app().await;

    let (status, body) = send_get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["database"], json!("connected"));
}
