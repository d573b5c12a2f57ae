//! # API Configuration
//!
//! Environment-based configuration for the HTTP server.
//!
//! ## Environment Variables
//! ```text
//! PORT                        Listen port             (default: 3000)
//! DATABASE_PATH               SQLite file path        (default: stockpos.db)
//! DATABASE_MAX_CONNECTIONS    Pool size               (default: 5)
//! RUST_LOG                    Log filter              (default: info)
//! ```

use std::env;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port the HTTP server listens on.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Maximum connections in the database pool.
    pub database_max_connections: u32,
}

impl ApiConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(ApiConfig {
            port: parse_var("PORT", 3000)?,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "stockpos.db".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
        })
    }

    /// The socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert defaults for variables this test doesn't own the
        // environment for.
        let config = ApiConfig::load().unwrap();
        assert!(config.port > 0);
        assert!(config.database_max_connections > 0);
    }
}
