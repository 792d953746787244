use crate::entities::{
    menu_categories, menu_item_modifiers, menu_item_photos, menu_items, modifier_groups,
    modifier_options, order_items,
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(50)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🔄 Running schema migrations...");

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmts = vec![
        schema
            .create_table_from_entity(menu_categories::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(menu_items::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(menu_item_photos::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(modifier_groups::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(modifier_options::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(menu_item_modifiers::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(order_items::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await?;
    }

    // Lookup indexes for the hot list paths
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_menu_items_category_id ON menu_items(category_id);",
        "CREATE INDEX IF NOT EXISTS idx_menu_item_photos_item_id ON menu_item_photos(menu_item_id);",
        "CREATE INDEX IF NOT EXISTS idx_modifier_options_group_id ON modifier_options(modifier_group_id);",
        "CREATE INDEX IF NOT EXISTS idx_order_items_menu_item_id ON order_items(menu_item_id);",
    ];
    for sql in indexes {
        let _ = db
            .execute(sea_orm::Statement::from_string(builder, sql.to_string()))
            .await;
    }

    Ok(())
}
