mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use bloglist_auth::AuthPlugin;
use bloglist_blogs::BlogsPlugin;
use bloglist_core::plugin::PluginManager;
use bloglist_core::{DatabaseConfig, ServerConfig};
use bloglist_database::DbConnection;
use clap::Args;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub use shutdown::{close_database, shutdown_signal};

const CLEANUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3003", env = "BLOGLIST_ADDRESS")]
    pub address: String,

    /// Database connection URL, e.g. sqlite://bloglist.db?mode=rwc
    #[arg(long, env = "BLOGLIST_DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = bloglist_core::DEFAULT_MAX_CONNECTIONS, env = "BLOGLIST_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Minimum number of pooled database connections
    #[arg(long, default_value_t = bloglist_core::DEFAULT_MIN_CONNECTIONS, env = "BLOGLIST_MIN_CONNECTIONS")]
    pub min_connections: u32,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let database = DatabaseConfig::new(self.database_url)
            .with_pool_size(self.min_connections, self.max_connections);
        let config = ServerConfig::new(self.address, database)?;

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run_server(config))
    }
}

/// Registers the plugins against `db` and assembles the full router
pub async fn build_application(db: Arc<DbConnection>) -> anyhow::Result<Router> {
    let mut plugin_manager = PluginManager::new();
    plugin_manager.service_context().register_service(db);

    plugin_manager.register_plugin(Box::new(AuthPlugin::new()));
    plugin_manager.register_plugin(Box::new(BlogsPlugin::new()));

    plugin_manager
        .initialize_plugins()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize plugins: {}", e))?;

    debug!("Building application with plugin routes");
    let app = plugin_manager
        .build_application()
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    debug!("Initializing database connection...");
    let db = bloglist_database::establish_connection(&config.database).await?;

    let app = build_application(db.clone()).await?;

    let listener = TcpListener::bind(&config.address).await?;
    info!("Bloglist server listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");

    close_database(db, CLEANUP_TIMEOUT).await;
    Ok(())
}
