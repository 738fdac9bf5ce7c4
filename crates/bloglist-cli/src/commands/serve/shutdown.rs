use std::sync::Arc;
use std::time::Duration;

use bloglist_database::DbConnection;
use tracing::{debug, info, warn};

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// Closes the pool once the server no longer holds any handle to it.
/// Gives up after `cleanup_timeout`; remaining connections close on drop.
pub async fn close_database(db: Arc<DbConnection>, cleanup_timeout: Duration) {
    let conn = match Arc::try_unwrap(db) {
        Ok(conn) => conn,
        Err(shared) => {
            warn!(
                "Database connection still has {} handles, leaving it to close on drop",
                Arc::strong_count(&shared)
            );
            return;
        }
    };

    debug!("Closing database connection...");
    match tokio::time::timeout(cleanup_timeout, conn.close()).await {
        Ok(Ok(())) => info!("Database connection closed"),
        Ok(Err(e)) => warn!("Error while closing database connection: {}", e),
        Err(_) => warn!(
            "Cleanup timeout exceeded ({:?}), forcing shutdown",
            cleanup_timeout
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloglist_core::DatabaseConfig;

    #[tokio::test]
    async fn test_close_database_with_single_handle() {
        let config = DatabaseConfig::new("sqlite::memory:").with_pool_size(1, 1);
        let db = bloglist_database::establish_connection(&config).await.unwrap();
        close_database(db, Duration::from_secs(5)).await;
    }

    #[tokio::test]
    async fn test_close_database_leaves_shared_handle_open() {
        let config = DatabaseConfig::new("sqlite::memory:").with_pool_size(1, 1);
        let db = bloglist_database::establish_connection(&config).await.unwrap();
        let other = db.clone();

        close_database(db, Duration::from_secs(5)).await;
        assert!(other.ping().await.is_ok());
    }
}
