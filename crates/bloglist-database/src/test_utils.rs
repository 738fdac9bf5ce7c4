//! Test utilities for database integration tests
//!
//! Every [`TestDatabase`] is a private in-memory SQLite database with the
//! full schema applied. The pool holds a single connection because each
//! SQLite `:memory:` connection is its own database.

use crate::DbConnection;
use bloglist_migrations::Migrator;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

pub struct TestDatabase {
    pub db: Arc<DbConnection>,
}

impl TestDatabase {
    /// Connect without running migrations
    pub async fn new() -> anyhow::Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub async fn with_migrations() -> anyhow::Result<Self> {
        let test_db = Self::new().await?;
        Migrator::up(&*test_db.db, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        Ok(test_db)
    }

    pub fn connection(&self) -> Arc<DbConnection> {
        self.db.clone()
    }

    /// Execute raw SQL, e.g. to break the schema in failure tests
    pub async fn execute_sql(&self, sql: &str) -> anyhow::Result<ExecResult> {
        let statement = Statement::from_string(self.db.get_database_backend(), sql.to_owned());
        Ok(self.db.execute(statement).await?)
    }
}
