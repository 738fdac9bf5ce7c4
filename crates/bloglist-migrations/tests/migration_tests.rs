use bloglist_migrations::{Migrator, MigratorTrait, SchemaManager};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    Ok(Database::connect(options).await?)
}

#[tokio::test]
async fn test_migrations_create_schema() -> anyhow::Result<()> {
    let db = memory_db().await?;
    Migrator::up(&db, None).await?;

    let manager = SchemaManager::new(&db);
    for table in ["users", "sessions", "blogs"] {
        assert!(manager.has_table(table).await?, "missing table {table}");
    }
    assert!(manager.has_column("blogs", "likes").await?);

    Ok(())
}

#[tokio::test]
async fn test_username_is_unique() -> anyhow::Result<()> {
    let db = memory_db().await?;
    Migrator::up(&db, None).await?;

    let insert = "INSERT INTO users (username, name, password_hash, created_at, updated_at) \
                  VALUES ('mluukkai', 'Matti', 'x', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')";
    db.execute(Statement::from_string(db.get_database_backend(), insert))
        .await?;
    let duplicate = db
        .execute(Statement::from_string(db.get_database_backend(), insert))
        .await;

    assert!(duplicate.is_err());
    Ok(())
}

#[tokio::test]
async fn test_migrations_roll_back() -> anyhow::Result<()> {
    let db = memory_db().await?;
    Migrator::up(&db, None).await?;
    Migrator::down(&db, None).await?;

    let manager = SchemaManager::new(&db);
    assert!(!manager.has_table("blogs").await?);
    assert!(!manager.has_table("users").await?);
    Ok(())
}
