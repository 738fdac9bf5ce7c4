//! Database connection management

use bloglist_core::{DatabaseConfig, ServiceError, ServiceResult};
use bloglist_migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::{debug, info};

pub type DbConnection = DatabaseConnection;

/// Connects with the configured pool size and brings the schema up to date
pub async fn establish_connection(config: &DatabaseConfig) -> ServiceResult<Arc<DbConnection>> {
    config.validate()?;

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    debug!(
        "Connecting to database (pool {}..{})",
        config.min_connections, config.max_connections
    );
    let db = Database::connect(opt)
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    Migrator::up(&db, None)
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;
    info!("Database migrations applied");

    Ok(Arc::new(db))
}
