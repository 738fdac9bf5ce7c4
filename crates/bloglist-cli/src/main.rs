//! Bloglist CLI - single entrypoint for the blog list service

mod commands;

use clap::{Parser, Subcommand};
use commands::{CreateUserCommand, ServeCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "BLOGLIST_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "BLOGLIST_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeCommand),
    /// Create a user account
    CreateUser(CreateUserCommand),
}

/// Our crates log at `level`; noisy dependencies stay at warn
fn default_filter(level: &str) -> String {
    format!(
        "bloglist={level},\
         bloglist_cli={level},\
         bloglist_core={level},\
         bloglist_auth={level},\
         bloglist_blogs={level},\
         bloglist_database={level},\
         bloglist_migrations={level},\
         tower_http={level},\
         sqlx=warn,\
         sea_orm=warn,\
         sea_orm_migration=warn,\
         hyper=warn",
        level = level
    )
}

fn init_tracing(log_level: &str, log_format: &str) -> anyhow::Result<()> {
    // RUST_LOG, when set, takes full control of filtering
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG environment variable: {}", e))?
    } else {
        tracing_subscriber::EnvFilter::try_new(default_filter(log_level))
            .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", log_level, e))?
    };

    let fmt_layer = match log_format {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Serve(serve_cmd) => serve_cmd.execute(),
        Commands::CreateUser(create_cmd) => create_cmd.execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(default_filter("debug")).is_ok());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["bloglist", "serve", "--database-url", "sqlite::memory:"])
            .unwrap();
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, "compact");
        match cli.command {
            Commands::Serve(cmd) => {
                assert_eq!(cmd.address, "127.0.0.1:3003");
                assert_eq!(cmd.max_connections, 10);
                assert_eq!(cmd.min_connections, 1);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_create_user_requires_username() {
        let result = Cli::try_parse_from([
            "bloglist",
            "create-user",
            "--database-url",
            "sqlite::memory:",
            "--name",
            "Root",
        ]);
        assert!(result.is_err());
    }
}
