//! Order core configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARDHAUS_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `CARDHAUS_DB_MAX_CONNECTIONS` - pool size (default: 10)
//! - `CARDHAUS_DB_ACQUIRE_TIMEOUT_SECS` - pool acquire timeout (default: 10)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Order subsystem configuration.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Pool acquire timeout
    pub acquire_timeout: Duration,
}

impl OrdersConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `CARDHAUS_DATABASE_URL` is missing or an
    /// optional variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("CARDHAUS_DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("CARDHAUS_DATABASE_URL".to_owned()))?;

        let max_connections = parse_or_default(
            "CARDHAUS_DB_MAX_CONNECTIONS",
            std::env::var("CARDHAUS_DB_MAX_CONNECTIONS").ok(),
            DEFAULT_MAX_CONNECTIONS,
        )?;

        let acquire_timeout_secs = parse_or_default(
            "CARDHAUS_DB_ACQUIRE_TIMEOUT_SECS",
            std::env::var("CARDHAUS_DB_ACQUIRE_TIMEOUT_SECS").ok(),
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

fn parse_or_default<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), raw))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default_uses_default_when_unset() {
        let parsed: u32 = parse_or_default("X", None, 10).unwrap();
        assert_eq!(parsed, 10);
    }

    #[test]
    fn test_parse_or_default_parses_value() {
        let parsed: u32 = parse_or_default("X", Some("25".to_owned()), 10).unwrap();
        assert_eq!(parsed, 25);
    }

    #[test]
    fn test_parse_or_default_rejects_garbage() {
        let err = parse_or_default::<u32>("X", Some("lots".to_owned()), 10).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
