//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Load the sample catalog into an empty database at startup
    pub seed_catalog: bool,

    /// Pool size
    pub db_max_connections: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Environment Variables
    /// - `CARHIRE_HTTP_PORT` (default 8080)
    /// - `CARHIRE_DATABASE_PATH` (default `carhire.db`)
    /// - `CARHIRE_SEED_CATALOG` (default true)
    /// - `CARHIRE_DB_MAX_CONNECTIONS` (default 5)
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: lookup("CARHIRE_HTTP_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CARHIRE_HTTP_PORT".to_string()))?,

            database_path: lookup("CARHIRE_DATABASE_PATH")
                .unwrap_or_else(|| "carhire.db".to_string()),

            seed_catalog: lookup("CARHIRE_SEED_CATALOG")
                .unwrap_or_else(|| "true".to_string())
                .trim()
                .parse()
                .unwrap_or(true),

            db_max_connections: lookup("CARHIRE_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("CARHIRE_DB_MAX_CONNECTIONS".to_string())
                })?,
        };

        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "CARHIRE_DATABASE_PATH".to_string(),
            ));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "CARHIRE_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }
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
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(
            config,
            ApiConfig {
                http_port: 8080,
                database_path: "carhire.db".to_string(),
                seed_catalog: true,
                db_max_connections: 5,
            }
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CARHIRE_HTTP_PORT", "9000"),
            ("CARHIRE_DATABASE_PATH", "/data/carhire.db"),
            ("CARHIRE_SEED_CATALOG", "false"),
            ("CARHIRE_DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert_eq!(config.database_path, "/data/carhire.db");
        assert!(!config.seed_catalog);
        assert_eq!(config.db_max_connections, 2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("CARHIRE_HTTP_PORT", "http")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CARHIRE_DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CARHIRE_DATABASE_PATH", " ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
