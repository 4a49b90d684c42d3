//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is unset (local frontends).
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Interface to bind
    pub bind_address: String,

    /// SQLite database file
    pub database_path: String,

    /// Pool size for the SQLite connection pool
    pub db_max_connections: u32,

    /// Allowed CORS origins; a single `*` allows any origin
    pub cors_allowed_origins: Vec<String>,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./tienda.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDRESS".to_string()))
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(DEFAULT_CORS_ORIGINS),
            vec![
                "http://localhost:3000",
                "http://127.0.0.1:3000",
                "http://localhost:5173"
            ]
        );
        assert_eq!(parse_origins(" * , "), vec!["*"]);
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_listen_addr() {
        let config = ApiConfig {
            http_port: 8080,
            bind_address: "127.0.0.1".to_string(),
            database_path: "./tienda.db".to_string(),
            db_max_connections: 5,
            cors_allowed_origins: vec![],
            log_level: "info".to_string(),
        };
        assert_eq!(config.listen_addr().unwrap().port(), 8080);

        let bad = ApiConfig {
            bind_address: "not an address".to_string(),
            ..config
        };
        assert!(bad.listen_addr().is_err());
    }
}
