//! Configuration management utilities

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
        }
    }

    pub fn with_pool_size(mut self, min_connections: u32, max_connections: u32) -> Self {
        self.min_connections = min_connections;
        self.max_connections = max_connections;
        self
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.url.trim().is_empty() {
            return Err(ServiceError::Configuration {
                message: "database url must not be empty".to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ServiceError::Configuration {
                message: "max_connections must be at least 1".to_string(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ServiceError::Configuration {
                message: format!(
                    "min_connections ({}) exceeds max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }
        Ok(())
    }
}

/// Resolved settings for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3003`
    pub address: String,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    pub fn new(address: impl Into<String>, database: DatabaseConfig) -> ServiceResult<Self> {
        let config = Self {
            address: address.into(),
            database,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ServiceError::Configuration {
                message: format!("invalid listen address '{}'", self.address),
            });
        }
        self.database.validate()
    }
}
