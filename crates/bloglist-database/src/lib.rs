//! Database connection and test utilities

pub use sea_orm;
mod connection;

pub use connection::{establish_connection, DbConnection};

// Export test utilities for use by other crates in their tests
pub mod test_utils;

#[cfg(test)]
mod tests {
    use super::*;
    use bloglist_core::{DatabaseConfig, ServiceError};
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn test_establish_connection_with_migrations() -> anyhow::Result<()> {
        let config = DatabaseConfig::new("sqlite::memory:").with_pool_size(1, 1);
        let db = establish_connection(&config).await?;

        let row = db
            .query_one(sea_orm::Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS count FROM blogs".to_owned(),
            ))
            .await?;
        assert!(row.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_establish_connection_rejects_invalid_config() {
        let config = DatabaseConfig::new("");
        let result = establish_connection(&config).await;
        assert!(matches!(result, Err(ServiceError::Configuration { .. })));
    }
}
